//! Class store.

use std::sync::Arc;

use api_protocol::{Class, CreateClassRequest, ListClassesResponse, UpdateClassRequest};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the class collection.
pub struct ClassStore {
    client: Arc<ApiClient>,
    classes: Cached<Vec<Class>>,
    selected: Cached<Class>,
}

impl ClassStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            classes: Cached::new(),
            selected: Cached::new(),
        }
    }

    /// Returns the cached class list, if any.
    pub fn classes(&self) -> Option<Vec<Class>> {
        self.classes.get()
    }

    /// Returns the cached selected class, if any.
    pub fn selected(&self) -> Option<Class> {
        self.selected.get()
    }

    /// Subscribes to class list changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Vec<Class>>> {
        self.classes.subscribe()
    }

    /// Fetches all classes.
    pub async fn fetch_all(&self) -> ClientResult<Vec<Class>> {
        let listing: ListClassesResponse = self.client.get("/classes").await?;
        self.classes.set(listing.classes.clone());
        Ok(listing.classes)
    }

    /// Fetches one class.
    pub async fn fetch(&self, id: &str) -> ClientResult<Class> {
        let class: Class = self.client.get(&format!("/classes/{id}")).await?;
        self.selected.set(class.clone());
        Ok(class)
    }

    /// Creates a class and folds it into the cached list.
    pub async fn create(&self, title: impl Into<String>) -> ClientResult<Class> {
        let class: Class = self
            .client
            .post(
                "/classes",
                &CreateClassRequest {
                    title: title.into(),
                },
            )
            .await?;
        self.classes.update(|list| list.insert(0, class.clone()));
        Ok(class)
    }

    /// Renames a class.
    pub async fn rename(&self, id: &str, title: impl Into<String>) -> ClientResult<Class> {
        let class: Class = self
            .client
            .put(
                &format!("/classes/{id}"),
                &UpdateClassRequest {
                    title: Some(title.into()),
                },
            )
            .await?;
        self.classes.update(|list| {
            if let Some(cached) = list.iter_mut().find(|c| c.id == class.id) {
                *cached = class.clone();
            }
        });
        Ok(class)
    }

    /// Deletes a class and drops it from the cached list. The server
    /// cascades to projects and their feedback.
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/classes/{id}")).await?;
        self.classes.update(|list| list.retain(|c| c.id != id));
        Ok(())
    }
}
