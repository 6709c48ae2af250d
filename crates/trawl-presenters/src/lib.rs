//! Presentation over raw backend responses: facet computation, spelling
//! suggestions and hit expansion.

pub mod facets;
pub mod results;
pub mod spelling;

pub use facets::{ExampleInfo, FacetCalculator, FacetOption, FacetResult};
pub use results::ResultPresenter;
pub use spelling::{
    suggest, CorrectionBlocklist, SpellCheckPresenter, SpellingCandidate, SuggestionMode,
};
