mod chunk;
mod record;

pub use chunk::{aggregate, AggregateResult, AggregateSpec, AggregateSummary, ChunkSummary};
pub use record::TimeRecord;
