//! Domain layer: entities, identifiers, money, and revenue rollups.
//!
//! Everything here is plain data plus pure functions. Persistence and
//! access control live in [`crate::persistence`] and [`crate::service`].

pub mod exhibition;
pub mod ids;
pub mod money;
pub mod order;
pub mod product;
pub mod report;
pub mod user;

pub use exhibition::{Exhibition, ExhibitionPatch, ExhibitionStatus, NewExhibition};
pub use ids::{ExhibitionId, OrderId, ProductId, UserId};
pub use money::{Money, Quantity};
pub use order::{Customer, Order, OrderFilter};
pub use product::{Product, ProductPatch, ProductSnapshot};
pub use report::{CellValue, OrderView, ProductSales, ReportColumn, ReportTable, RevenueStats};
pub use user::{Role, User, UserProfile};
