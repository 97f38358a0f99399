use async_trait::async_trait;
use std::cmp::Reverse;
use tokio::sync::Mutex;

use crate::{
    ads::{
        filter::ListingFilter,
        repo::{AdRepo, ApplyChanges},
        repo_types::{Ad, CompletedRow, ListingRow, MyAdRow, NewAd},
    },
    auth::{repo::UserRepo, repo_types::User},
    catalog::{
        repo::CatalogRepo,
        repo_types::{CatalogEntry, CatalogKind},
    },
    error::AppError,
};

/// In-process store with the same semantics as the Postgres one. Backs
/// `AppState::fake()`.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i32,
    users: Vec<User>,
    cities: Vec<CatalogEntry>,
    categories: Vec<CatalogEntry>,
    ad_types: Vec<CatalogEntry>,
    ad_statuses: Vec<CatalogEntry>,
    ads: Vec<Ad>,
}

impl Inner {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn table(&self, kind: CatalogKind) -> &Vec<CatalogEntry> {
        match kind {
            CatalogKind::City => &self.cities,
            CatalogKind::Category => &self.categories,
            CatalogKind::AdType => &self.ad_types,
            CatalogKind::AdStatus => &self.ad_statuses,
        }
    }

    fn table_mut(&mut self, kind: CatalogKind) -> &mut Vec<CatalogEntry> {
        match kind {
            CatalogKind::City => &mut self.cities,
            CatalogKind::Category => &mut self.categories,
            CatalogKind::AdType => &mut self.ad_types,
            CatalogKind::AdStatus => &mut self.ad_statuses,
        }
    }

    fn name_of(&self, kind: CatalogKind, id: i32) -> Option<String> {
        self.table(kind)
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
    }

    /// Inner join of an ad with its reference rows.
    fn listing_row(&self, ad: &Ad) -> Option<ListingRow> {
        Some(ListingRow {
            ad_id: ad.ad_id,
            title: ad.title.clone(),
            description: ad.description.clone(),
            price: ad.price,
            post_date: ad.post_date,
            image_path: ad.image_path.clone(),
            city_id: ad.city_id,
            category_id: ad.category_id,
            type_id: ad.type_id,
            status_id: ad.status_id,
            city_name: self.name_of(CatalogKind::City, ad.city_id)?,
            category_name: self.name_of(CatalogKind::Category, ad.category_id)?,
            type_name: self.name_of(CatalogKind::AdType, ad.type_id)?,
            status_name: self.name_of(CatalogKind::AdStatus, ad.status_id)?,
        })
    }

    /// Ads in listing order: newest first, ties by id.
    fn ads_newest_first(&self) -> Vec<&Ad> {
        let mut ads: Vec<&Ad> = self.ads.iter().collect();
        ads.sort_by_key(|a| (Reverse(a.post_date), a.ad_id));
        ads
    }
}

impl MemoryStore {
    /// Adds reference rows and returns their ids in the given order.
    pub async fn seed(&self, kind: CatalogKind, names: &[&str]) -> Vec<i32> {
        let mut inner = self.inner.lock().await;
        names
            .iter()
            .map(|name| {
                let id = inner.next_id();
                inner.table_mut(kind).push(CatalogEntry {
                    id,
                    name: (*name).to_string(),
                });
                id
            })
            .collect()
    }

    pub async fn all_ads(&self) -> Vec<Ad> {
        self.inner.lock().await.ads.clone()
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_login(&self, login: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.login == login).cloned())
    }

    async fn create(&self, login: &str, password_hash: &str) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.login == login) {
            return Err(AppError::Conflict("login already taken".into()));
        }
        let user = User {
            user_id: inner.next_id(),
            login: login.to_string(),
            password_hash: password_hash.to_string(),
        };
        inner.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CatalogRepo for MemoryStore {
    async fn list(&self, kind: CatalogKind) -> Result<Vec<CatalogEntry>, AppError> {
        let inner = self.inner.lock().await;
        let mut rows = inner.table(kind).clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find(&self, kind: CatalogKind, id: i32) -> Result<Option<CatalogEntry>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.table(kind).iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_name(
        &self,
        kind: CatalogKind,
        name: &str,
    ) -> Result<Option<CatalogEntry>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .table(kind)
            .iter()
            .filter(|e| e.name == name)
            .min_by_key(|e| e.id)
            .cloned())
    }
}

#[async_trait]
impl AdRepo for MemoryStore {
    async fn insert(&self, ad: NewAd) -> Result<Ad, AppError> {
        let mut inner = self.inner.lock().await;
        let row = Ad {
            ad_id: inner.next_id(),
            user_id: ad.user_id,
            title: ad.title,
            description: ad.description,
            price: ad.price,
            post_date: ad.post_date,
            image_path: ad.image_path,
            city_id: ad.city_id,
            category_id: ad.category_id,
            type_id: ad.type_id,
            status_id: ad.status_id,
            profit_amount: ad.profit_amount,
        };
        inner.ads.push(row.clone());
        Ok(row)
    }

    async fn find_owned(&self, ad_id: i32, owner: i32) -> Result<Option<Ad>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .ads
            .iter()
            .find(|a| a.ad_id == ad_id && a.user_id == owner)
            .cloned())
    }

    async fn update_owned(
        &self,
        ad_id: i32,
        owner: i32,
        apply: ApplyChanges<'_>,
    ) -> Result<Ad, AppError> {
        let mut inner = self.inner.lock().await;
        let slot = inner
            .ads
            .iter_mut()
            .find(|a| a.ad_id == ad_id && a.user_id == owner)
            .ok_or_else(|| AppError::NotFound(format!("ad {ad_id} not found")))?;
        let mut next = apply(slot.clone())?;
        // Identity columns are not updatable.
        next.ad_id = slot.ad_id;
        next.user_id = slot.user_id;
        next.post_date = slot.post_date;
        *slot = next.clone();
        Ok(next)
    }

    async fn delete_owned(&self, ad_id: i32, owner: i32) -> Result<bool, AppError> {
        let mut inner = self.inner.lock().await;
        let before = inner.ads.len();
        inner.ads.retain(|a| !(a.ad_id == ad_id && a.user_id == owner));
        Ok(inner.ads.len() < before)
    }

    async fn list_by_owner(&self, owner: i32) -> Result<Vec<MyAdRow>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .ads_newest_first()
            .into_iter()
            .filter(|a| a.user_id == owner)
            .filter_map(|a| {
                Some(MyAdRow {
                    ad_id: a.ad_id,
                    title: a.title.clone(),
                    price: a.price,
                    post_date: a.post_date,
                    status_name: inner.name_of(CatalogKind::AdStatus, a.status_id)?,
                })
            })
            .collect())
    }

    async fn search(&self, filter: &ListingFilter) -> Result<Vec<ListingRow>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .ads_newest_first()
            .into_iter()
            .filter_map(|a| inner.listing_row(a))
            .filter(|row| filter.matches(row))
            .collect())
    }

    async fn completed_for(
        &self,
        owner: i32,
        completed_status_name: &str,
    ) -> Result<Vec<CompletedRow>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .ads_newest_first()
            .into_iter()
            .filter(|a| a.user_id == owner)
            .filter_map(|a| {
                let row = inner.listing_row(a)?;
                if row.status_name != completed_status_name {
                    return None;
                }
                Some(CompletedRow {
                    ad_id: row.ad_id,
                    title: row.title,
                    description: row.description,
                    price: row.price,
                    post_date: row.post_date,
                    profit_amount: a.profit_amount?,
                    city_name: row.city_name,
                    category_name: row.category_name,
                    type_name: row.type_name,
                })
            })
            .collect())
    }
}
