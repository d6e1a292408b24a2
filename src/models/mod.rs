/*!
Data structures produced by the policy parser: rule-level types, the peering model, the filter
catalog and route objects.
*/
mod filter;
mod peering;
mod policy;
mod route;

pub use filter::*;
pub use peering::*;
pub use policy::*;
pub use route::*;
