pub mod crossfilter;
pub mod dimension;
pub mod extractors;
pub mod filter;
pub mod group;

pub use crossfilter::{Crossfilter, FilterChange, MAX_DIMENSIONS};
pub use dimension::{Arity, DimensionId, DimensionSpec, KeyExtractor};
pub use filter::FilterPredicate;
pub use group::{
    Accumulator, AverageReducer, CountReducer, FnReducer, GroupEntry, GroupId, Metric, Reducer,
    SumReducer, average,
};
