//! Shared fixtures for service tests.

#![allow(clippy::panic)]

use std::sync::Arc;

use chrono::Utc;

use crate::auth::SessionClaims;
use crate::domain::{
    Exhibition, ExhibitionStatus, Money, NewExhibition, Product, Role, User,
};
use crate::persistence::{MemoryStore, Store};

/// An in-memory store plus helpers to seed it.
#[derive(Debug)]
pub(crate) struct Fixture {
    pub store: Arc<dyn Store>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
        }
    }

    pub fn store(&self) -> Arc<dyn Store> {
        Arc::clone(&self.store)
    }

    pub async fn user(&self, username: &str, role: Role) -> User {
        let user = User::new(username.into(), "unused-hash".into(), role);
        let Ok(()) = self.store.insert_user(&user).await else {
            panic!("seeding user {username} failed");
        };
        user
    }

    pub async fn admin(&self) -> SessionClaims {
        claims(&self.user("admin", Role::Admin).await)
    }

    pub async fn exhibition(&self, name: &str, status: ExhibitionStatus) -> Exhibition {
        let mut exhibition = Exhibition::new(NewExhibition {
            name: name.into(),
            city: "Jaipur".into(),
            start_date: Utc::now(),
            end_date: None,
            description: None,
            image_url: None,
        });
        exhibition.status = status;
        let Ok(()) = self.store.insert_exhibition(&exhibition).await else {
            panic!("seeding exhibition {name} failed");
        };
        exhibition
    }

    pub async fn product(&self, name: &str, sku: &str, price: i64) -> Product {
        let Ok(price) = Money::new(price) else {
            panic!("bad seed price");
        };
        let product = Product::new(name.into(), sku.into(), price, None);
        let Ok(()) = self.store.insert_product(&product).await else {
            panic!("seeding product {sku} failed");
        };
        product
    }
}

/// Claims as a freshly issued token for `user` would carry them.
pub(crate) fn claims(user: &User) -> SessionClaims {
    SessionClaims {
        id: user.id,
        role: user.role,
        username: user.username.clone(),
        assigned_exhibition_id: user.assigned_exhibition_id,
        iat: 0,
        exp: i64::MAX,
    }
}
