//! Aggregations over a cleaned dataset.
//!
//! Every function here borrows the dataset and returns a new derived table or
//! scalar; none of them modify their input.

pub mod aggregate;
pub mod distribution;
pub mod events;
pub mod geo;
pub mod trends;
pub mod types;
pub mod utility;

pub use aggregate::{category_counts, regional_average, shorten_label, top_categories, top_regions};
pub use distribution::{box_plot, histogram};
pub use events::{PolicyImpact, high_pollution_events, policy_impact};
pub use geo::{CoordinateMap, Coordinates, attach_coordinates, coordinate_grid};
pub use trends::{monthly_average, seasonal_average, yearly_average};
