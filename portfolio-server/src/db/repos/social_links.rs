//! Social links with a manually maintained `order`

use portfolio_core::models::{timestamp, NewSocialLink, SocialLink};
use portfolio_core::{Document, Validate, ValidationError};
use uuid::Uuid;

use super::{DbError, Repo};
use crate::db::store::{Direction, DocumentStore, Filter, FindOptions};

pub struct SocialLinkRepo<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> SocialLinkRepo<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// Active-only or all links, by ascending `order`
    pub async fn list(&self, active: Option<bool>) -> Result<Vec<SocialLink>, DbError> {
        let filter = Filter::all().eq_opt("isActive", active);
        let options = FindOptions::default().sort_by("order", Direction::Asc);
        Repo::<SocialLink>::new(self.store).list(&filter, &options).await
    }

    /// One past the highest stored `order`, or 1 when there are no links
    pub async fn next_order(&self) -> Result<i64, DbError> {
        let options = FindOptions::default()
            .sort_by("order", Direction::Desc)
            .limit(1);
        let highest = self
            .store
            .find(SocialLink::COLLECTION, &Filter::all(), &options)
            .await?
            .into_iter()
            .next()
            .and_then(|doc| doc.get("order").and_then(|v| v.as_i64()));
        match highest {
            None => Ok(1),
            Some(max) => max.checked_add(1).ok_or_else(|| {
                ValidationError::Inconsistent {
                    reason: "order cannot follow the highest possible value",
                }
                .into()
            }),
        }
    }

    /// Validate and store a new link, assigning `order` when omitted
    pub async fn create(&self, payload: NewSocialLink) -> Result<SocialLink, DbError> {
        let order = match payload.order {
            Some(order) => order,
            None => self.next_order().await?,
        };
        let link = payload.into_link(Uuid::new_v4(), order, timestamp::now());
        link.validate()?;
        Repo::new(self.store).insert(&link).await?;
        Ok(link)
    }
}
