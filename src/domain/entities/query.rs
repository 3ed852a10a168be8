use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: String,
    pub desc: bool,
}

impl SortSpec {
    pub fn direction(&self) -> SortDirection {
        if self.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

// Any difference between two states invalidates pages loaded under the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryState {
    pub filters: Vec<ColumnFilter>,
    pub global_filter: Option<String>,
    pub sorting: Vec<SortSpec>,
}

impl QueryState {
    pub fn column_filter(&self, id: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|filter| filter.id == id)
            .map(|filter| filter.value.as_str())
    }

    pub fn sort_direction(&self, id: &str) -> Option<SortDirection> {
        self.sorting
            .iter()
            .find(|sort| sort.id == id)
            .map(SortSpec::direction)
    }

    pub fn set_global_filter(&mut self, text: &str) -> bool {
        let next = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
        if self.global_filter == next {
            return false;
        }
        self.global_filter = next;
        true
    }

    // An empty value removes the filter.
    pub fn set_column_filter(&mut self, id: &str, value: &str) -> bool {
        let position = self.filters.iter().position(|filter| filter.id == id);
        match (position, value.is_empty()) {
            (Some(pos), true) => {
                self.filters.remove(pos);
                true
            }
            (Some(pos), false) => {
                if self.filters[pos].value == value {
                    return false;
                }
                self.filters[pos].value = value.to_string();
                true
            }
            (None, true) => false,
            (None, false) => {
                self.filters.push(ColumnFilter {
                    id: id.to_string(),
                    value: value.to_string(),
                });
                true
            }
        }
    }

    /// asc -> desc -> unsorted. Without `multi` the column replaces the previous sort.
    pub fn cycle_sort(&mut self, id: &str, multi: bool) {
        let next_desc = match self.sort_direction(id) {
            None => Some(false),
            Some(SortDirection::Asc) => Some(true),
            Some(SortDirection::Desc) => None,
        };

        if !multi {
            self.sorting.retain(|sort| sort.id == id);
        }

        let position = self.sorting.iter().position(|sort| sort.id == id);
        match (position, next_desc) {
            (Some(pos), Some(desc)) => self.sorting[pos].desc = desc,
            (Some(pos), None) => {
                self.sorting.remove(pos);
            }
            (None, Some(desc)) => self.sorting.push(SortSpec {
                id: id.to_string(),
                desc,
            }),
            (None, None) => {}
        }
    }

    pub fn clear(&mut self) -> bool {
        if *self == QueryState::default() {
            return false;
        }
        *self = QueryState::default();
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub query: QueryState,
    pub page_index: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn offset(&self) -> usize {
        self.page_index * self.page_size
    }
}
