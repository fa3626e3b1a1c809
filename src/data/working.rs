use std::path::Path;

use anyhow::{Context, Result};

use crate::config::DashboardConfig;

use super::filter::{FilterSelection, filtered_indices, restrict};
use super::join::inner_join;
use super::loader::load_table;
use super::model::Table;
use super::options::FilterOptions;
use super::schema::{COL_ESTABLISHMENT_TYPE, COL_REGION, SpecialtyColumns};

/// The joined, region-restricted dataset every query runs against.
/// Built once per load and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    pub table: Table,
    pub specialty_columns: SpecialtyColumns,
    pub options: FilterOptions,
}

impl WorkingSet {
    /// Join the two source tables and apply the static region / type filter.
    pub fn build(scores: &Table, directory: &Table, config: &DashboardConfig) -> Result<Self> {
        let joined = inner_join(scores, directory, &config.scores_key, &config.directory_key)
            .context("joining indicators with the school directory")?;

        let table = restrict(
            &joined,
            &[
                (COL_REGION, config.region.as_str()),
                (COL_ESTABLISHMENT_TYPE, config.establishment_type.as_str()),
            ],
        );
        log::info!(
            "Working table: {} of {} joined rows in {} / {}",
            table.len(),
            joined.len(),
            config.region,
            config.establishment_type
        );
        if table.is_empty() {
            log::warn!(
                "No {} in {} after the join; check the region and type settings",
                config.establishment_type,
                config.region
            );
        }

        Ok(Self::from_table(table))
    }

    /// Wrap an already prepared table.
    pub fn from_table(table: Table) -> Self {
        let specialty_columns = SpecialtyColumns::resolve(&table);
        let missing = specialty_columns.missing();
        if !missing.is_empty() {
            log::warn!("No rate column for specialties {missing:?}");
        }
        let options = FilterOptions::from_table(&table);
        WorkingSet {
            table,
            specialty_columns,
            options,
        }
    }

    /// Load both input files and build the working set.
    pub fn load(scores_path: &Path, directory_path: &Path, config: &DashboardConfig) -> Result<Self> {
        let scores = load_table(scores_path)?;
        let directory = load_table(directory_path)?;
        Self::build(&scores, &directory, config)
    }

    /// Run the query engine for one selection.
    pub fn query(&self, selection: &FilterSelection) -> Vec<usize> {
        filtered_indices(&self.table, &self.specialty_columns, selection)
    }
}
