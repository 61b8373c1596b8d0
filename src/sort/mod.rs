mod algorithms;
mod engine;

pub use algorithms::{merge_sort_by_key, quicksort_by_key};
pub use engine::{sort_records, Record, SortDirection, SortMethod};
