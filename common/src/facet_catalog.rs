//! Ordered facet field -> label mapping with registered overrides.

use indexmap::IndexMap;

use crate::search_const::DEFAULT_FACETS;


pub type FacetMap = IndexMap<String, String>;

/// Transform over the accumulated facet mapping; may add, remove or relabel.
pub type FacetContributor = Box<dyn Fn(FacetMap) -> FacetMap + Send + Sync>;

/// Contributors are registered at startup and applied in registration order.
#[derive(Default)]
pub struct FacetCatalog {
    contributors: Vec<FacetContributor>,
}

impl FacetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, contributor: impl Fn(FacetMap) -> FacetMap + Send + Sync + 'static) {
        self.contributors.push(Box::new(contributor));
    }

    pub fn with(mut self, contributor: impl Fn(FacetMap) -> FacetMap + Send + Sync + 'static) -> Self {
        self.register(contributor);
        self
    }

    pub fn len(&self) -> usize {
        self.contributors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contributors.is_empty()
    }

    pub fn resolve(&self, default_facets: FacetMap) -> FacetMap {
        resolve(default_facets, &self.contributors)
    }
}

impl std::fmt::Debug for FacetCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FacetCatalog")
            .field("contributors", &self.contributors.len())
            .finish()
    }
}

pub fn resolve(default_facets: FacetMap, contributors: &[FacetContributor]) -> FacetMap {
    contributors.iter().fold(default_facets, |facets, contributor| contributor(facets))
}

/// Built-in facets with their labels.
pub fn default_facets() -> FacetMap {
    DEFAULT_FACETS
        .iter()
        .map(|(field, label)| (field.to_string(), label.to_string()))
        .collect()
}

/// Facets for an explicit field list, labelled from the built-ins when known.
pub fn facets_for_fields<'a>(fields: impl IntoIterator<Item = &'a str>) -> FacetMap {
    let known = default_facets();
    fields
        .into_iter()
        .map(|field| {
            let label = known.get(field).cloned().unwrap_or_else(|| field.to_string());
            (field.to_string(), label)
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn no_contributors_keeps_defaults() {
        let catalog = FacetCatalog::new();
        assert!(catalog.is_empty());
        let facets = catalog.resolve(default_facets());
        assert_eq!(
            facets.keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["organization", "groups", "tags", "res_format", "license_id"]
        );
    }

    #[test]
    fn contributors_run_in_registration_order() {
        let catalog = FacetCatalog::new()
            .with(|mut facets| {
                facets.shift_remove("groups");
                facets.insert("publisher".into(), "Publishers".into());
                facets
            })
            .with(|mut facets| {
                facets.insert("publisher".into(), "Publisher".into());
                facets.shift_remove("license_id");
                facets
            });
        assert_eq!(catalog.len(), 2);
        let facets = catalog.resolve(default_facets());
        assert_eq!(
            facets.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect::<Vec<_>>(),
            vec![
                ("organization", "Organizations"),
                ("tags", "Tags"),
                ("res_format", "Formats"),
                ("publisher", "Publisher"),
            ]
        );
    }

    #[test]
    fn fields_get_known_labels() {
        let facets = facets_for_fields(["tags", "custom_field"]);
        assert_eq!(facets["tags"], "Tags");
        assert_eq!(facets["custom_field"], "custom_field");
    }
}
