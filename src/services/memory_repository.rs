//! In-memory repositories used by handler tests.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::CoffeeRepository;
use crate::{
    error::AppError,
    models::coffee::{Coffee, CoffeeDocument, CoffeeId, DeleteAck, InsertAck, UpdateAck},
};

/// Keeps documents in insertion order, which stands in for the natural order
/// of the real table.
#[derive(Debug, Default)]
pub struct MemoryCoffeeRepository {
    coffees: RwLock<Vec<(CoffeeId, CoffeeDocument)>>,
}

impl MemoryCoffeeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.coffees.read().await.len()
    }
}

#[async_trait]
impl CoffeeRepository for MemoryCoffeeRepository {
    async fn list(&self) -> Result<Vec<Coffee>, AppError> {
        Ok(self
            .coffees
            .read()
            .await
            .iter()
            .map(|(id, fields)| Coffee {
                id: *id,
                fields: fields.clone(),
            })
            .collect())
    }

    async fn get(&self, id: CoffeeId) -> Result<Option<Coffee>, AppError> {
        Ok(self
            .coffees
            .read()
            .await
            .iter()
            .find(|(stored, _)| *stored == id)
            .map(|(id, fields)| Coffee {
                id: *id,
                fields: fields.clone(),
            }))
    }

    async fn insert(&self, document: CoffeeDocument) -> Result<InsertAck, AppError> {
        let id = CoffeeId::from(Uuid::new_v4());
        self.coffees.write().await.push((id, document));
        Ok(InsertAck::new(id))
    }

    async fn update(&self, id: CoffeeId, set: CoffeeDocument) -> Result<UpdateAck, AppError> {
        let mut coffees = self.coffees.write().await;
        let Some((_, document)) = coffees.iter_mut().find(|(stored, _)| *stored == id) else {
            return Ok(UpdateAck::new(0, 0));
        };

        let before = document.clone();
        document.extend(set);

        Ok(UpdateAck::new(1, u64::from(before != *document)))
    }

    async fn delete(&self, id: CoffeeId) -> Result<DeleteAck, AppError> {
        let mut coffees = self.coffees.write().await;
        let before = coffees.len();
        coffees.retain(|(stored, _)| *stored != id);
        Ok(DeleteAck::new((before - coffees.len()) as u64))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Repository whose store is unreachable: every call fails.
#[derive(Debug, Default)]
pub struct UnavailableCoffeeRepository;

#[async_trait]
impl CoffeeRepository for UnavailableCoffeeRepository {
    async fn list(&self) -> Result<Vec<Coffee>, AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn get(&self, _id: CoffeeId) -> Result<Option<Coffee>, AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn insert(&self, _document: CoffeeDocument) -> Result<InsertAck, AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn update(&self, _id: CoffeeId, _set: CoffeeDocument) -> Result<UpdateAck, AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn delete(&self, _id: CoffeeId) -> Result<DeleteAck, AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Err(sqlx::Error::PoolClosed.into())
    }
}
