//! Pagination state, intents and reducer.

use crate::mvi::{Intent, Reducer, UiState};

/// One batch of items plus the cursor for the batch after it.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T, C> {
    pub items: Vec<T>,
    pub next_cursor: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next_cursor: Option<C>) -> Self {
        Self { items, next_cursor }
    }
}

/// Accumulated list owned by a [`PaginationEngine`](super::PaginationEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState<T, C> {
    pub items: Vec<T>,
    pub cursor: Option<C>,
    pub loading: bool,
    /// Bumped by every first-page request; completions carrying an older
    /// generation are stale.
    pub generation: u64,
    /// At least one page of the current generation has arrived.
    pub has_loaded: bool,
}

impl<T, C> Default for PaginationState<T, C> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            cursor: None,
            loading: false,
            generation: 0,
            has_loaded: false,
        }
    }
}

impl<T, C> UiState for PaginationState<T, C>
where
    T: Clone + PartialEq + Send + 'static,
    C: Clone + PartialEq + Send + 'static,
{
}

impl<T, C> PaginationState<T, C> {
    /// True once the current request has been exhausted.
    pub fn is_last_page(&self) -> bool {
        self.has_loaded && !self.loading && self.cursor.is_none()
    }

    /// A next-page request would be honoured.
    pub fn can_load_next(&self) -> bool {
        !self.loading && self.cursor.is_some()
    }
}

#[derive(Debug, Clone)]
pub enum PaginationIntent<T, C> {
    /// A new list was requested. Starts a new generation.
    FirstPageRequested { clear: bool },
    /// More items were requested. No-op unless idle with a cursor.
    NextPageRequested,
    PageLoaded {
        generation: u64,
        first: bool,
        page: Page<T, C>,
    },
    PageFailed { generation: u64 },
}

impl<T: Send + 'static, C: Send + 'static> Intent for PaginationIntent<T, C> {}

pub struct PaginationReducer<T, C> {
    _marker: std::marker::PhantomData<fn() -> (T, C)>,
}

impl<T, C> Reducer for PaginationReducer<T, C>
where
    T: Clone + PartialEq + Send + 'static,
    C: Clone + PartialEq + Send + 'static,
{
    type State = PaginationState<T, C>;
    type Intent = PaginationIntent<T, C>;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            PaginationIntent::FirstPageRequested { clear } => PaginationState {
                items: if clear { Vec::new() } else { state.items },
                cursor: None,
                loading: true,
                generation: state.generation.wrapping_add(1),
                has_loaded: false,
            },

            PaginationIntent::NextPageRequested => {
                if state.can_load_next() {
                    PaginationState {
                        loading: true,
                        ..state
                    }
                } else {
                    state
                }
            }

            PaginationIntent::PageLoaded {
                generation,
                first,
                page,
            } => {
                if generation != state.generation {
                    return state;
                }
                let mut items = if first { Vec::new() } else { state.items };
                items.extend(page.items);
                PaginationState {
                    items,
                    cursor: page.next_cursor,
                    loading: false,
                    generation,
                    has_loaded: true,
                }
            }

            PaginationIntent::PageFailed { generation } => {
                if generation != state.generation {
                    return state;
                }
                PaginationState {
                    loading: false,
                    ..state
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type State = PaginationState<u32, String>;
    type Reduce = PaginationReducer<u32, String>;

    fn loaded(items: Vec<u32>, cursor: Option<&str>) -> State {
        State {
            items,
            cursor: cursor.map(str::to_string),
            loading: false,
            generation: 1,
            has_loaded: true,
        }
    }

    #[test]
    fn first_page_request_starts_loading_and_bumps_generation() {
        let state = Reduce::reduce(State::default(), PaginationIntent::FirstPageRequested { clear: false });
        assert!(state.loading);
        assert_eq!(state.generation, 1);
        assert!(!state.has_loaded);
    }

    #[test]
    fn first_page_request_keeps_items_unless_clearing() {
        let kept = Reduce::reduce(
            loaded(vec![1, 2], Some("c")),
            PaginationIntent::FirstPageRequested { clear: false },
        );
        assert_eq!(kept.items, vec![1, 2]);
        assert_eq!(kept.cursor, None);

        let cleared = Reduce::reduce(
            loaded(vec![1, 2], Some("c")),
            PaginationIntent::FirstPageRequested { clear: true },
        );
        assert!(cleared.items.is_empty());
    }

    #[test]
    fn next_page_requires_cursor_and_idle() {
        let no_cursor = Reduce::reduce(loaded(vec![1], None), PaginationIntent::NextPageRequested);
        assert!(!no_cursor.loading);

        let mut busy = loaded(vec![1], Some("c"));
        busy.loading = true;
        let busy = Reduce::reduce(busy, PaginationIntent::NextPageRequested);
        assert!(busy.loading);

        let ready = Reduce::reduce(loaded(vec![1], Some("c")), PaginationIntent::NextPageRequested);
        assert!(ready.loading);
        assert_eq!(ready.cursor.as_deref(), Some("c"));
    }

    #[test]
    fn first_page_replaces_and_next_page_appends() {
        let state = Reduce::reduce(
            loaded(vec![9], Some("old")),
            PaginationIntent::FirstPageRequested { clear: false },
        );
        let generation = state.generation;
        let state = Reduce::reduce(
            state,
            PaginationIntent::PageLoaded {
                generation,
                first: true,
                page: Page::new(vec![1, 2], Some("p2".to_string())),
            },
        );
        assert_eq!(state.items, vec![1, 2]);

        let state = Reduce::reduce(state, PaginationIntent::NextPageRequested);
        let state = Reduce::reduce(
            state,
            PaginationIntent::PageLoaded {
                generation,
                first: false,
                page: Page::new(vec![2, 3], None),
            },
        );
        assert_eq!(state.items, vec![1, 2, 2, 3]);
        assert!(state.is_last_page());
    }

    #[test]
    fn stale_generation_is_ignored() {
        let state = Reduce::reduce(State::default(), PaginationIntent::FirstPageRequested { clear: false });
        let state = Reduce::reduce(state, PaginationIntent::FirstPageRequested { clear: false });
        let stale = Reduce::reduce(
            state.clone(),
            PaginationIntent::PageLoaded {
                generation: 1,
                first: true,
                page: Page::new(vec![1], None),
            },
        );
        assert_eq!(stale, state);

        let failed = Reduce::reduce(state.clone(), PaginationIntent::PageFailed { generation: 1 });
        assert!(failed.loading);
    }

    #[test]
    fn failure_stops_loading_and_keeps_items() {
        let mut state = loaded(vec![1], Some("c"));
        state.loading = true;
        let state = Reduce::reduce(state, PaginationIntent::PageFailed { generation: 1 });
        assert!(!state.loading);
        assert_eq!(state.items, vec![1]);
        assert_eq!(state.cursor.as_deref(), Some("c"));
    }
}
