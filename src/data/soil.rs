use std::{collections::BTreeMap, path::Path};

use polars::frame::DataFrame;
use serde::Serialize;

use crate::{
    data::{frame, normalize_columns},
    error::{Error, Result},
    zone::{NormMeta, Zone, ZoneTable},
};

/// Soil measurements averaged per district and normalized into zone features.
pub const SOIL_FEATURES: [&str; 8] = [
    "pH",
    "MO_pct",
    "CEC_cmol_kg",
    "N_total_pct",
    "P_disponible_mg_kg",
    "K_intercambiable_mg_kg",
    "pendiente_pct",
    "indice_calidad_suelo",
];

const DISTRICT: &str = "distrito";
const PROVINCE: &str = "provincia";

/// Per-district aggregate of the raw soil samples.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistrictSummary {
    pub distrito: String,
    pub provincia: Option<String>,
    pub lat: f64,
    pub lon: f64,
    /// Number of samples taken in the district.
    pub muestras: usize,
    /// Raw feature means.
    #[serde(flatten)]
    pub features: BTreeMap<String, f64>,
    pub soil_score: f64,
}

/// Soil samples grouped by district.
#[derive(Clone, Debug)]
pub struct SoilDataset {
    rows: usize,
    districts: Vec<DistrictSummary>, // Descending soil score
    table: ZoneTable,
    norm_meta: NormMeta,
}

impl SoilDataset {
    pub fn from_csv(path: &Path) -> Result<Self> { Self::from_dataframe(&frame::read_csv(path)?) }

    pub fn from_csv_str(csv: &str) -> Result<Self> { Self::from_dataframe(&frame::read_csv_str(csv)?) }

    /// Group samples by district, normalize the feature means and derive soil scores.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let districts = frame::string_column(df, DISTRICT)?;
        let provinces = frame::optional_string_column(df, PROVINCE)?;
        let lat = frame::numeric_column(df, "lat")?;
        let lon = frame::numeric_column(df, "lon")?;
        let features = SOIL_FEATURES.iter()
            .map(|name| frame::numeric_column(df, name))
            .collect::<Result<Vec<_>>>()?;

        // District id -> sample rows, in sorted id order.
        let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (row, district) in districts.iter().enumerate() {
            if let Some(district) = district {
                groups.entry(district.as_str()).or_default().push(row);
            }
        }
        if groups.is_empty() {
            return Err(Error::upstream("soil dataset has no districts"))
        }

        let mut summaries = Vec::with_capacity(groups.len());
        let mut raw = Vec::with_capacity(groups.len());
        for (district, rows) in &groups {
            let undefined = |what: &str| Error::upstream(format!("district {district} has no {what} values"));
            let lat_mean = frame::mean(rows.iter().map(|&r| lat[r])).ok_or_else(|| undefined("lat"))?;
            let lon_mean = frame::mean(rows.iter().map(|&r| lon[r])).ok_or_else(|| undefined("lon"))?;
            let means = SOIL_FEATURES.iter().zip(&features)
                .map(|(name, column)| frame::mean(rows.iter().map(|&r| column[r])).ok_or_else(|| undefined(*name)))
                .collect::<Result<Vec<_>>>()?;

            summaries.push(DistrictSummary {
                distrito: district.to_string(),
                provincia: rows.iter().find_map(|&r| provinces[r].clone()),
                lat: lat_mean,
                lon: lon_mean,
                muestras: rows.len(),
                features: SOIL_FEATURES.iter().map(|f| f.to_string()).zip(means.iter().copied()).collect(),
                soil_score: 0.0,
            });
            raw.push(means);
        }

        let names = SOIL_FEATURES.iter().map(|f| f.to_string()).collect::<Vec<_>>();
        let (norm_meta, normalized) = normalize_columns(&names, &raw)?;
        for (summary, norm) in summaries.iter_mut().zip(&normalized) {
            summary.soil_score = norm.iter().sum::<f64>() / norm.len() as f64;
        }

        // Stable, so equal scores keep district id order.
        let mut order = (0..summaries.len()).collect::<Vec<_>>();
        order.sort_by(|&a, &b| summaries[b].soil_score.total_cmp(&summaries[a].soil_score));

        let zones = order.iter()
            .map(|&i| {
                let s = &summaries[i];
                Zone::new(s.distrito.clone(), s.lat, s.lon, s.soil_score, normalized[i].clone())
            })
            .collect();
        let table = ZoneTable::new(names, zones)?;
        let districts = order.into_iter().map(|i| summaries[i].clone()).collect::<Vec<_>>();

        tracing::info!(rows = df.height(), districts = districts.len(), "loaded soil dataset");
        Ok(Self { rows: df.height(), districts, table, norm_meta })
    }

    /// Number of raw sample rows.
    #[inline] pub fn rows(&self) -> usize { self.rows }

    /// Districts in descending soil score order.
    #[inline] pub fn districts(&self) -> &[DistrictSummary] { &self.districts }

    /// Normalized zones, in the same order as [`Self::districts`].
    #[inline] pub fn zone_table(&self) -> &ZoneTable { &self.table }

    #[inline] pub fn norm_meta(&self) -> &NormMeta { &self.norm_meta }

    /// The `limit` best-scoring districts.
    pub fn ranking(&self, limit: usize) -> &[DistrictSummary] {
        &self.districts[..limit.min(self.districts.len())]
    }

    /// Distinct provinces, in ranking order of first appearance.
    pub fn provinces(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for province in self.districts.iter().filter_map(|d| d.provincia.as_deref()) {
            if !seen.contains(&province) { seen.push(province) }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "distrito,provincia,lat,lon,pH,MO_pct,CEC_cmol_kg,N_total_pct,P_disponible_mg_kg,K_intercambiable_mg_kg,pendiente_pct,indice_calidad_suelo";

    fn csv(rows: &[&str]) -> String {
        std::iter::once(HEADER).chain(rows.iter().copied()).collect::<Vec<_>>().join("\n") + "\n"
    }

    fn sample() -> String {
        csv(&[
            "Pilcomayo,Huancayo,-12.05,-75.25,6.0,3.0,20,0.20,15,150,5,0.70",
            "Pilcomayo,Huancayo,-12.07,-75.27,7.0,4.0,24,0.30,25,250,7,0.90",
            "Chilca,Huancayo,-12.08,-75.20,5.0,1.0,10,0.10,5,50,20,0.20",
            "Sapallanga,Huancayo,-12.14,-75.16,6.0,2.5,18,0.20,12,120,10,0.50",
        ])
    }

    #[test]
    fn groups_samples_by_district() {
        let soil = SoilDataset::from_csv_str(&sample()).unwrap();
        assert_eq!(soil.rows(), 4);
        assert_eq!(soil.districts().len(), 3);

        let pilcomayo = soil.districts().iter().find(|d| d.distrito == "Pilcomayo").unwrap();
        assert_eq!(pilcomayo.muestras, 2);
        assert!((pilcomayo.lat - -12.06).abs() < 1e-9);
        assert!((pilcomayo.features["pH"] - 6.5).abs() < 1e-9);
        assert_eq!(pilcomayo.provincia.as_deref(), Some("Huancayo"));
    }

    #[test]
    fn ranks_by_descending_soil_score() {
        let soil = SoilDataset::from_csv_str(&sample()).unwrap();
        let ids = soil.districts().iter().map(|d| d.distrito.as_str()).collect::<Vec<_>>();
        // Pilcomayo holds every feature maximum except slope, Chilca every minimum except slope.
        assert_eq!(ids, vec!["Pilcomayo", "Sapallanga", "Chilca"]);

        let scores = soil.districts().iter().map(|d| d.soil_score).collect::<Vec<_>>();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (0.0..=1.0).contains(s)));

        let table = soil.zone_table();
        assert_eq!(table.zones()[0].id(), "Pilcomayo");
        assert_eq!(table.feature_names().len(), 8);
        assert_eq!(soil.ranking(2).len(), 2);
        assert_eq!(soil.ranking(50).len(), 3);
        assert_eq!(soil.provinces(), vec!["Huancayo"]);
    }

    #[test]
    fn normalization_metadata_covers_district_means() {
        let soil = SoilDataset::from_csv_str(&sample()).unwrap();
        let ph = soil.norm_meta()["pH"];
        assert_eq!((ph.min, ph.max), (5.0, 6.5));
        for zone in soil.zone_table().zones() {
            assert!(zone.features().iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn unparsable_values_are_skipped() {
        let soil = SoilDataset::from_csv_str(&csv(&[
            "A,P,-12.0,-75.0,abc,1,1,1,1,1,1,1",
            "A,P,-12.0,-75.0,6.0,1,1,1,1,1,1,1",
            "B,P,-12.1,-75.1,5.0,2,2,2,2,2,2,2",
        ])).unwrap();
        let a = soil.districts().iter().find(|d| d.distrito == "A").unwrap();
        assert_eq!(a.features["pH"], 6.0);
    }

    #[test]
    fn bad_cells_past_the_first_hundred_rows_are_missing() {
        let rows = (0..300)
            .map(|i| {
                let district = ["A", "B", "C"][i % 3];
                let ph = if i == 250 { "abc".to_string() } else { format!("{}", 5 + i % 3) };
                let cec = if i == 270 { "20.5" } else { "20" };
                format!("{district},P,-12.{i:03},-75.0,{ph},2,{cec},1,1,1,1,1")
            })
            .collect::<Vec<_>>();
        let soil = SoilDataset::from_csv_str(&csv(&rows.iter().map(String::as_str).collect::<Vec<_>>())).unwrap();
        assert_eq!(soil.rows(), 300);
        assert_eq!(soil.districts().len(), 3);

        // Row 250 belongs to B (pH 6 everywhere else), row 270 to A.
        let b = soil.districts().iter().find(|d| d.distrito == "B").unwrap();
        assert_eq!(b.features["pH"], 6.0);
        let a = soil.districts().iter().find(|d| d.distrito == "A").unwrap();
        assert!((a.features["CEC_cmol_kg"] - (99.0 * 20.0 + 20.5) / 100.0).abs() < 1e-9);
    }

    #[test]
    fn undefined_district_means_are_upstream_errors() {
        let err = SoilDataset::from_csv_str(&csv(&[
            "A,P,-12.0,-75.0,,1,1,1,1,1,1,1",
            "B,P,-12.1,-75.1,5.0,2,2,2,2,2,2,2",
        ])).unwrap_err();
        assert!(matches!(err, Error::UpstreamData(_)));

        let missing = SoilDataset::from_csv_str("distrito,lat,lon\nA,1,1\n").unwrap_err();
        assert!(matches!(missing, Error::UpstreamData(_)));
    }
}
