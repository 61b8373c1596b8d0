mod bellman_ford;
mod floyd_warshall;

pub use bellman_ford::{bellman_ford, ShortestPathResult};
pub use floyd_warshall::{floyd_warshall, DistanceMatrix};
