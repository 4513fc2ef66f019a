//! # Species Catalog
//!
//! The static registry of supported species. Each entry bundles a [`Genome`], the
//! genetic maps published for its genome build, and the demographic models from
//! the literature. The registry is built once, on first access.
//!
//! ```ignore
//! use stdpopsim::catalog;
//!
//! let human = catalog::get_species("homo_sapiens")?;
//! let chr22 = human.genome.chromosome("chr22")?;
//! let ooa = human.get_model("gutenkunst_ooa_3")?;
//! ```

mod drosophila_melanogaster;
mod homo_sapiens;

use crate::core::genome::{Genome, GenomeError};
use crate::core::maps::GeneticMap;
use crate::core::models::{Model, piecewise_constant_size};
use phf::{Map, phf_map};
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unknown species '{0}'")]
    UnknownSpecies(String),

    #[error("Unknown model '{model}' for species '{species}'")]
    UnknownModel { species: String, model: String },

    #[error(transparent)]
    Genome(#[from] GenomeError),
}

/// Alternative names accepted for a species, keyed by their normalized form.
static SPECIES_ALIASES: Map<&'static str, &'static str> = phf_map! {
    "homsap" => "homo_sapiens",
    "human" => "homo_sapiens",
    "dromel" => "drosophila_melanogaster",
    "fly" => "drosophila_melanogaster",
};

static CATALOG: LazyLock<Vec<Species>> = LazyLock::new(|| {
    vec![
        homo_sapiens::species(),
        drosophila_melanogaster::species(),
    ]
});

/// A species with its reference genome and published demographic models.
#[derive(Debug, Clone)]
pub struct Species {
    pub id: &'static str,
    pub name: &'static str,
    pub common_name: &'static str,
    pub genome: Genome,
    /// Years per generation.
    pub generation_time: f64,
    /// Effective population size used by the default model.
    pub population_size: f64,
    models: Vec<Model>,
}

impl Species {
    pub fn models(&self) -> &[Model] {
        &self.models
    }

    pub fn get_model(&self, id: &str) -> Result<&Model, CatalogError> {
        self.models
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| CatalogError::UnknownModel {
                species: self.id.to_string(),
                model: id.to_string(),
            })
    }

    /// A single population of constant size at the species' effective size.
    pub fn default_model(&self) -> Model {
        let mut model = piecewise_constant_size(self.population_size, &[]);
        model.generation_time = Some(self.generation_time);
        model
    }

    /// Resolves a model id, falling back to [`Species::default_model`] for `None`
    /// or for the generic `constant` id.
    pub fn resolve_model(&self, id: Option<&str>) -> Result<Model, CatalogError> {
        match id {
            None | Some("constant") => Ok(self.default_model()),
            Some(id) => self.get_model(id).cloned(),
        }
    }

    pub fn get_genetic_map(&self, id: &str) -> Result<&GeneticMap, CatalogError> {
        Ok(self.genome.get_genetic_map(id)?)
    }
}

fn normalize(id: &str) -> String {
    id.trim().replace('-', "_").to_lowercase()
}

/// Looks up a species by id or alias. Hyphens are treated as underscores and case
/// is ignored, so `homo-sapiens` and `HomSap` both resolve to `homo_sapiens`.
pub fn get_species(id: &str) -> Result<&'static Species, CatalogError> {
    let normalized = normalize(id);
    let canonical = SPECIES_ALIASES
        .get(normalized.as_str())
        .copied()
        .unwrap_or(normalized.as_str());
    CATALOG
        .iter()
        .find(|s| s.id == canonical)
        .ok_or_else(|| CatalogError::UnknownSpecies(id.to_string()))
}

pub fn all_species() -> &'static [Species] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{DEFAULT_ATOL, DEFAULT_RTOL};

    #[test]
    fn species_resolve_by_id_and_alias() {
        assert_eq!(get_species("homo_sapiens").unwrap().id, "homo_sapiens");
        assert_eq!(get_species("homo-sapiens").unwrap().id, "homo_sapiens");
        assert_eq!(get_species("HomSap").unwrap().id, "homo_sapiens");
        assert_eq!(get_species("DroMel").unwrap().id, "drosophila_melanogaster");
    }

    #[test]
    fn unknown_species_is_an_error() {
        assert!(matches!(
            get_species("jibberish"),
            Err(CatalogError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn every_catalog_model_is_valid() {
        for species in all_species() {
            assert!(species.default_model().validate().is_ok());
            for model in species.models() {
                if let Err(e) = model.validate() {
                    panic!("{}/{} is invalid: {}", species.id, model.id, e);
                }
                assert!(model.generation_time.is_some());
                assert!(!model.citations.is_empty());
            }
        }
    }

    #[test]
    fn every_species_has_its_default_map_registered() {
        for species in all_species() {
            if let Some(map) = species.genome.default_genetic_map {
                assert!(species.get_genetic_map(map).is_ok());
            }
            for map in species.genome.genetic_maps() {
                assert_eq!(map.species, species.id);
                assert!(map.file_pattern.contains("{name}"));
            }
        }
    }

    #[test]
    fn resolve_model_falls_back_to_constant_size() {
        let species = get_species("homo_sapiens").unwrap();
        let model = species.resolve_model(None).unwrap();
        assert_eq!(model.id, "constant");
        assert_eq!(model.population_configurations[0].initial_size, 10_000.0);
        assert!(model.equals(
            &species.resolve_model(Some("constant")).unwrap(),
            DEFAULT_RTOL,
            DEFAULT_ATOL
        ));
        assert!(matches!(
            species.resolve_model(Some("jibberish")),
            Err(CatalogError::UnknownModel { .. })
        ));
    }
}
