//! Joins display names onto order records.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::domain::{ExhibitionId, Order, OrderView, UserId};
use crate::error::SalesError;
use crate::persistence::Store;

/// Wraps each order with its salesman's username and exhibition name.
///
/// Each distinct salesman and exhibition is looked up once. A reference
/// that no longer resolves yields `None` rather than an error.
pub(crate) async fn order_views(
    store: &dyn Store,
    orders: Vec<Order>,
) -> Result<Vec<OrderView>, SalesError> {
    let mut usernames: HashMap<UserId, Option<String>> = HashMap::new();
    let mut exhibition_names: HashMap<ExhibitionId, Option<String>> = HashMap::new();

    for order in &orders {
        if let Entry::Vacant(slot) = usernames.entry(order.salesman_id) {
            slot.insert(
                store
                    .user_by_id(order.salesman_id)
                    .await?
                    .map(|u| u.username),
            );
        }
        if let Entry::Vacant(slot) = exhibition_names.entry(order.exhibition_id) {
            slot.insert(
                store
                    .exhibition_by_id(order.exhibition_id)
                    .await?
                    .map(|e| e.name),
            );
        }
    }

    Ok(orders
        .into_iter()
        .map(|order| OrderView {
            salesman_username: usernames.get(&order.salesman_id).cloned().flatten(),
            exhibition_name: exhibition_names
                .get(&order.exhibition_id)
                .cloned()
                .flatten(),
            order,
        })
        .collect())
}
