use async_trait::async_trait;

use crate::error::ModelResult;
use crate::model::core_trait::RestfulModel;

/// Hooks around persistence. Every method defaults to a no-op.
#[async_trait]
pub trait ModelObserver<M: Send + Sync>: Send + Sync {
    /// Before the first insert; may modify the model
    async fn creating(&self, _model: &mut M) -> ModelResult<()> {
        Ok(())
    }

    async fn created(&self, _model: &M) -> ModelResult<()> {
        Ok(())
    }

    /// Before an update is written; may modify the model
    async fn updating(&self, _model: &mut M) -> ModelResult<()> {
        Ok(())
    }

    async fn updated(&self, _model: &M) -> ModelResult<()> {
        Ok(())
    }

    async fn deleting(&self, _model: &M) -> ModelResult<()> {
        Ok(())
    }

    async fn deleted(&self, _model: &M) -> ModelResult<()> {
        Ok(())
    }
}

/// The creation hook: fills in a missing UUID key
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyObserver;

#[async_trait]
impl<M: RestfulModel> ModelObserver<M> for UuidKeyObserver {
    async fn creating(&self, model: &mut M) -> ModelResult<()> {
        model.ensure_uuid_key();
        Ok(())
    }
}

/// Observers registered for one model type, run in registration order.
/// The first error aborts the flow.
pub struct ModelLifecycle<M: RestfulModel> {
    observers: Vec<Box<dyn ModelObserver<M>>>,
}

impl<M: RestfulModel> ModelLifecycle<M> {
    /// A lifecycle with no observers at all, not even the UUID hook
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// A lifecycle with the UUID creation hook registered first
    pub fn with_defaults() -> Self {
        let mut lifecycle = Self::new();
        lifecycle.register_observer(Box::new(UuidKeyObserver));
        lifecycle
    }

    pub fn register_observer(&mut self, observer: Box<dyn ModelObserver<M>>) {
        self.observers.push(observer);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub async fn trigger_creating(&self, model: &mut M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.creating(model).await?;
        }
        Ok(())
    }

    pub async fn trigger_created(&self, model: &M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.created(model).await?;
        }
        Ok(())
    }

    pub async fn trigger_updating(&self, model: &mut M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.updating(model).await?;
        }
        Ok(())
    }

    pub async fn trigger_updated(&self, model: &M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.updated(model).await?;
        }
        Ok(())
    }

    pub async fn trigger_deleting(&self, model: &M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.deleting(model).await?;
        }
        Ok(())
    }

    pub async fn trigger_deleted(&self, model: &M) -> ModelResult<()> {
        for observer in &self.observers {
            observer.deleted(model).await?;
        }
        Ok(())
    }
}

impl<M: RestfulModel> Default for ModelLifecycle<M> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attributes;
    use crate::error::ModelError;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone)]
    struct Widget {
        attributes: Attributes,
    }

    impl RestfulModel for Widget {
        fn table_name() -> &'static str {
            "widgets"
        }

        fn from_attributes(attributes: Attributes) -> Self {
            Self { attributes }
        }

        fn attributes(&self) -> &Attributes {
            &self.attributes
        }

        fn attributes_mut(&mut self) -> &mut Attributes {
            &mut self.attributes
        }
    }

    #[derive(Clone, Default)]
    struct Tracker {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl Tracker {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ModelObserver<Widget> for Tracker {
        async fn creating(&self, model: &mut Widget) -> ModelResult<()> {
            let has_uuid = model.attributes().contains("uuid");
            self.events
                .lock()
                .unwrap()
                .push(format!("creating (uuid: {})", has_uuid));
            Ok(())
        }

        async fn created(&self, _model: &Widget) -> ModelResult<()> {
            self.events.lock().unwrap().push("created".to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_uuid_hook_runs_before_later_observers() {
        let tracker = Tracker::default();
        let mut lifecycle = ModelLifecycle::<Widget>::with_defaults();
        lifecycle.register_observer(Box::new(tracker.clone()));

        let mut widget = Widget::from_attributes(Attributes::new().with("name", "gear"));
        lifecycle.trigger_creating(&mut widget).await.unwrap();
        lifecycle.trigger_created(&widget).await.unwrap();

        assert!(widget.uuid_key().is_some());
        assert_eq!(tracker.events(), vec!["creating (uuid: true)", "created"]);
    }

    #[tokio::test]
    async fn test_bare_lifecycle_has_no_hook() {
        let lifecycle = ModelLifecycle::<Widget>::new();
        assert_eq!(lifecycle.observer_count(), 0);

        let mut widget = Widget::from_attributes(Attributes::new());
        lifecycle.trigger_creating(&mut widget).await.unwrap();
        assert!(!widget.attributes().contains("uuid"));
    }

    #[tokio::test]
    async fn test_observer_error_stops_flow() {
        struct Refuse;

        #[async_trait]
        impl ModelObserver<Widget> for Refuse {
            async fn creating(&self, _model: &mut Widget) -> ModelResult<()> {
                Err(ModelError::Event("widgets are read-only".to_string()))
            }
        }

        let tracker = Tracker::default();
        let mut lifecycle = ModelLifecycle::<Widget>::new();
        lifecycle.register_observer(Box::new(Refuse));
        lifecycle.register_observer(Box::new(tracker.clone()));

        let mut widget = Widget::from_attributes(Attributes::new());
        let result = lifecycle.trigger_creating(&mut widget).await;

        assert!(matches!(result, Err(ModelError::Event(_))));
        assert!(tracker.events().is_empty());
    }
}
