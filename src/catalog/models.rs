use serde::{Deserialize, Serialize};

/// Category label that marks a row as a cloud recording tier
pub const RECORDING_CATEGORY: &str = "GRABACIÓN DE VIDEO EN LA NUBE";

/// Default tag for solutions whose rows carry no `Etiqueta`
pub const DEFAULT_SOLUTION_TAG: &str = "General";

/// Default concept for components whose rows carry no `Concepto`
pub const DEFAULT_COMPONENT_CONCEPT: &str = "Componente";

/// Flat catalog entry: one analytics add-on or one cloud recording tier.
///
/// Field names follow the spreadsheet headers, which is also the JSON shape
/// served on `/api/precios`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    pub id: u32,
    pub categoria: String,
    pub servicio: String,
    pub modalidad: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retencion_imagenes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolucion_predeterminada: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<String>,
    pub precio_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notas: Option<String>,
}

impl PriceRow {
    /// Whether this row is a cloud recording tier rather than an analytics add-on
    pub fn is_recording_tier(&self) -> bool {
        self.categoria == RECORDING_CATEGORY
    }
}

/// One cost line of an in-house solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentCost {
    pub concept: String,
    pub cost_usd: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// In-house solution assembled from every source row sharing its name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionDef {
    pub id: String,
    pub name: String,
    pub etiqueta: String,
    pub components: Vec<ComponentCost>,
}

impl SolutionDef {
    /// Sum of the component costs. Recomputed on every call.
    pub fn total_cost(&self) -> f64 {
        self.components.iter().map(|c| c.cost_usd).sum()
    }
}

/// Flat service catalog, immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceCatalog {
    rows: Vec<PriceRow>,
}

impl ServiceCatalog {
    pub fn new(rows: Vec<PriceRow>) -> Self {
        Self { rows }
    }

    /// All rows in source order
    pub fn services(&self) -> &[PriceRow] {
        &self.rows
    }

    /// Rows that are analytics add-ons (everything except recording tiers)
    pub fn analytics(&self) -> impl Iterator<Item = &PriceRow> {
        self.rows.iter().filter(|r| !r.is_recording_tier())
    }

    /// Rows that are cloud recording tiers
    pub fn recording_tiers(&self) -> impl Iterator<Item = &PriceRow> {
        self.rows.iter().filter(|r| r.is_recording_tier())
    }

    /// First row carrying `id`, if any
    pub fn service(&self, id: u32) -> Option<&PriceRow> {
        self.rows.iter().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Grouped solution catalog, immutable once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolutionCatalog {
    solutions: Vec<SolutionDef>,
}

impl SolutionCatalog {
    pub fn new(solutions: Vec<SolutionDef>) -> Self {
        Self { solutions }
    }

    pub fn solutions(&self) -> &[SolutionDef] {
        &self.solutions
    }

    pub fn solution(&self, id: &str) -> Option<&SolutionDef> {
        self.solutions.iter().find(|s| s.id == id)
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}
