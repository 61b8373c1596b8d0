use std::{path::PathBuf, sync::Arc};

use serde::Serialize;

use crate::{
    config::GraphConfig,
    data::{ClimateDataset, SoilDataset},
    error::Result,
    graph::{build_zone_graph, ZoneGraph},
    zone::NormMeta,
};

/// Where the soil and climate datasets come from.
pub trait DataSource {
    fn load_soil(&self) -> Result<SoilDataset>;
    fn load_climate(&self) -> Result<ClimateDataset>;
}

/// Datasets read from a pair of CSV files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CsvSource {
    pub soil_path: PathBuf,
    pub climate_path: PathBuf,
}

impl CsvSource {
    pub fn new(soil_path: impl Into<PathBuf>, climate_path: impl Into<PathBuf>) -> Self {
        Self { soil_path: soil_path.into(), climate_path: climate_path.into() }
    }
}

impl DataSource for CsvSource {
    fn load_soil(&self) -> Result<SoilDataset> { SoilDataset::from_csv(&self.soil_path) }
    fn load_climate(&self) -> Result<ClimateDataset> { ClimateDataset::from_csv(&self.climate_path) }
}

/// Both datasets as loaded at one point in time.
#[derive(Clone, Debug)]
pub struct DatasetSnapshot {
    soil: SoilDataset,
    climate: ClimateDataset,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClimateSummary {
    pub rows: usize,
    pub years: Option<YearRange>,
    pub monthly_records: usize,
    pub ubigeos: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SoilSummary {
    pub rows: usize,
    pub distritos: usize,
    pub provincias: Vec<String>,
    pub feature_norms: NormMeta,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub climate: ClimateSummary,
    pub soil: SoilSummary,
}

impl DatasetSnapshot {
    pub fn new(soil: SoilDataset, climate: ClimateDataset) -> Self { Self { soil, climate } }

    #[inline] pub fn soil(&self) -> &SoilDataset { &self.soil }
    #[inline] pub fn climate(&self) -> &ClimateDataset { &self.climate }

    /// Build the zone similarity graph of the soil districts under `config`.
    pub fn zone_graph(&self, config: &GraphConfig) -> Result<ZoneGraph> {
        build_zone_graph(self.soil.zone_table(), config)
    }

    pub fn summary(&self) -> DatasetSummary {
        DatasetSummary {
            climate: ClimateSummary {
                rows: self.climate.len(),
                years: self.climate.years().map(|(min, max)| YearRange { min, max }),
                monthly_records: self.climate.monthly().len(),
                ubigeos: self.climate.stations(),
            },
            soil: SoilSummary {
                rows: self.soil.rows(),
                distritos: self.soil.districts().len(),
                provincias: self.soil.provinces().into_iter().map(str::to_owned).collect(),
                feature_norms: self.soil.norm_meta().clone(),
            },
        }
    }
}

/// Owns a data source and the snapshot loaded from it.
///
/// Nothing is read until [`DataStore::load`]; later loads reuse the snapshot until
/// [`DataStore::reload`] replaces it. Snapshots are immutable and shared, so a reload never
/// changes data a caller already holds.
#[derive(Debug)]
pub struct DataStore<S: DataSource> {
    source: S,
    snapshot: Option<Arc<DatasetSnapshot>>,
}

impl<S: DataSource> DataStore<S> {
    pub fn new(source: S) -> Self { Self { source, snapshot: None } }

    #[inline] pub fn source(&self) -> &S { &self.source }

    /// The current snapshot, loading it on first use.
    pub fn load(&mut self) -> Result<Arc<DatasetSnapshot>> {
        match &self.snapshot {
            Some(snapshot) => Ok(Arc::clone(snapshot)),
            None => self.reload(),
        }
    }

    /// Read both datasets again and replace the current snapshot.
    pub fn reload(&mut self) -> Result<Arc<DatasetSnapshot>> {
        let snapshot = Arc::new(DatasetSnapshot::new(self.source.load_soil()?, self.source.load_climate()?));
        self.snapshot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// The current snapshot, if one has been loaded.
    pub fn snapshot(&self) -> Option<Arc<DatasetSnapshot>> { self.snapshot.clone() }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, fs};

    use super::*;
    use crate::error::Error;

    const SOIL: &str = "\
distrito,provincia,lat,lon,pH,MO_pct,CEC_cmol_kg,N_total_pct,P_disponible_mg_kg,K_intercambiable_mg_kg,pendiente_pct,indice_calidad_suelo
A,Huancayo,-12.00,-75.20,6.5,3.0,20,0.3,20,200,5,0.8
B,Huancayo,-12.05,-75.22,6.0,2.0,15,0.2,12,150,9,0.5
C,Concepcion,-11.90,-75.30,5.0,1.0,10,0.1,5,60,20,0.2
";

    const CLIMATE: &str = "\
UBIGEO,YY,MM,DY,HH,TT,HR,RR,PP,FF,DD
120101,2018,12,31,23,11.0,80,0.2,680.0,2.0,90
120101,2019,1,1,0,10.0,82,0.0,680.5,1.5,100
";

    struct Counting {
        loads: Cell<usize>,
    }

    impl DataSource for Counting {
        fn load_soil(&self) -> Result<SoilDataset> {
            self.loads.set(self.loads.get() + 1);
            SoilDataset::from_csv_str(SOIL)
        }
        fn load_climate(&self) -> Result<ClimateDataset> { ClimateDataset::from_csv_str(CLIMATE) }
    }

    #[test]
    fn load_reads_once_and_reload_replaces() {
        let mut store = DataStore::new(Counting { loads: Cell::new(0) });
        assert!(store.snapshot().is_none());

        let first = store.load().unwrap();
        let second = store.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.source().loads.get(), 1);

        let third = store.reload().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(store.source().loads.get(), 2);
        assert!(Arc::ptr_eq(&store.snapshot().unwrap(), &third));
    }

    #[test]
    fn csv_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let soil = dir.path().join("soil.csv");
        let climate = dir.path().join("climate.csv");
        fs::write(&soil, SOIL).unwrap();
        fs::write(&climate, CLIMATE).unwrap();

        let mut store = DataStore::new(CsvSource::new(&soil, &climate));
        let summary = store.load().unwrap().summary();

        assert_eq!(summary.soil.rows, 3);
        assert_eq!(summary.soil.distritos, 3);
        assert_eq!(summary.soil.provincias, vec!["Huancayo", "Concepcion"]);
        assert_eq!(summary.soil.feature_norms["pH"].max, 6.5);
        assert_eq!(summary.climate.rows, 2);
        assert_eq!(summary.climate.years, Some(YearRange { min: 2018, max: 2019 }));
        assert_eq!(summary.climate.monthly_records, 2);
        assert_eq!(summary.climate.ubigeos, 1);
    }

    #[test]
    fn missing_files_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DataStore::new(CsvSource::new(dir.path().join("a.csv"), dir.path().join("b.csv")));
        assert!(matches!(store.load(), Err(Error::NotFound(_))));
        assert!(store.snapshot().is_none());
    }

    #[test]
    fn snapshot_builds_zone_graphs() {
        let mut store = DataStore::new(Counting { loads: Cell::new(0) });
        let snapshot = store.load().unwrap();
        let graph = snapshot.zone_graph(&GraphConfig { k: 2, ..GraphConfig::default() }).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.best_zone().map(|z| z.id()), Some("A"));
    }
}
