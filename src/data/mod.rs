mod climate;
mod frame;
mod normalize;
mod soil;
mod store;

pub use climate::{ClimateDataset, ClimateReading, MonthlyClimate, SeriesPoint, CLIMATE_METRICS};
pub use normalize::normalize_columns;
pub use soil::{DistrictSummary, SoilDataset, SOIL_FEATURES};
pub use store::{
    ClimateSummary, CsvSource, DataSource, DataStore, DatasetSnapshot, DatasetSummary, SoilSummary, YearRange,
};
