mod assumption;
mod cost;
mod hourly;
mod scenario;
mod summary;

pub use self::{
    assumption::{AssumptionRow, AssumptionValue},
    cost::{CoarseCostRow, CostBucket, CostComponent, CostTable, DetailedCostRow, Technology},
    hourly::HourlyRow,
    scenario::{Catalog, ScenarioDescriptor, ScenarioIndex, ScenarioSource},
    summary::Summary,
};
