pub mod calculator;
pub mod cart;
pub mod input;
pub mod models;
pub mod summary;

pub use calculator::{
    aggregate_totals, apply_margin, build_quote, currency_convert, duplicate_flags, duplicate_ids,
    finalize, line_item_base_cost, recording_info, simulate,
};
pub use cart::{add_item, remove_item, toggle_service, toggle_solution, update_field, CartField};
pub use models::{
    CameraCartItem, CostPeriods, LineItemCost, Quote, QuoteOptions, QuoteRequest, QuoteTotals,
    RecordingChoice, RecordingInfo, Simulation, SimulationInput, LOCAL_RECORDING_PRICE,
};
pub use summary::render_summary;
