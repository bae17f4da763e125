//! Stream definition lifecycle.
//!
//! Names are soft-unique: re-creating a definition with the same name and an
//! equivalent schema returns the existing id.
use super::{TopologyService, name_or_generated};
use crate::error::{ServiceError, ServiceResult};
use crate::model::{Predicate, ResourceId, ResourceKind, StreamDefinition};
use crate::schema::ParameterDictionaryComparator;

#[derive(Debug, Clone, Default)]
pub struct NewStreamDefinition {
    pub name: String,
    pub schema: serde_json::Value,
    pub stream_type: String,
    pub description: String,
}

impl TopologyService {
    pub async fn create_stream_definition(
        &self,
        request: NewStreamDefinition,
    ) -> ServiceResult<ResourceId> {
        let _guard = self
            .lock_name(ResourceKind::StreamDefinition, &request.name)
            .await;
        if let Some(existing) = self
            .named(ResourceKind::StreamDefinition, &request.name)
            .await?
            .first()
        {
            let current: StreamDefinition = self.read_as(existing).await?;
            if ParameterDictionaryComparator::equivalent(&current.schema, &request.schema) {
                tracing::debug!(name = %request.name, id = %current.id, "stream definition already exists");
                return Ok(current.id);
            }
            return Err(ServiceError::conflict(format!(
                "stream definition {} already exists with a different schema",
                request.name
            )));
        }

        let definition = StreamDefinition {
            id: ResourceId::new(),
            name: name_or_generated(request.name),
            schema: request.schema,
            stream_type: request.stream_type,
            description: request.description,
        };
        let id = self.catalog.create(definition.clone().into()).await?;
        tracing::info!(name = %definition.name, %id, "stream definition created");
        Ok(id)
    }

    pub async fn read_stream_definition(&self, id: &ResourceId) -> ServiceResult<StreamDefinition> {
        self.read_as(id).await
    }

    pub async fn delete_stream_definition(&self, id: &ResourceId) -> ServiceResult<()> {
        let _guard = self.lock_entity(*id).await;
        let definition: StreamDefinition = self.read_as(id).await?;
        self.remove(id).await?;
        tracing::info!(name = %definition.name, %id, "stream definition deleted");
        Ok(())
    }

    /// True when both definitions carry equivalent schemas.
    pub async fn compare_stream_definitions(
        &self,
        first: &ResourceId,
        second: &ResourceId,
    ) -> ServiceResult<bool> {
        let first: StreamDefinition = self.read_as(first).await?;
        let second: StreamDefinition = self.read_as(second).await?;
        Ok(ParameterDictionaryComparator::equivalent(
            &first.schema,
            &second.schema,
        ))
    }

    /// Streams that declare `definition` as their schema.
    pub async fn find_streams_by_definition(
        &self,
        definition: &ResourceId,
    ) -> ServiceResult<Vec<ResourceId>> {
        let _: StreamDefinition = self.read_as(definition).await?;
        Ok(self
            .graph
            .subjects_of(definition, Predicate::HasStreamDefinition)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use serde_json::json;

    fn definition(name: &str, schema: serde_json::Value) -> NewStreamDefinition {
        NewStreamDefinition {
            name: name.to_string(),
            schema,
            stream_type: "sample".to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn same_name_same_schema_returns_existing_id() {
        let h = harness();
        let schema = json!({"temp": {"units": "C"}, "depth": {"units": "m"}});
        let first = h
            .service
            .create_stream_definition(definition("D1", schema.clone()))
            .await
            .expect("create");
        let again = h
            .service
            .create_stream_definition(definition("D1", schema))
            .await
            .expect("dedupe");
        assert_eq!(first, again);

        let err = h
            .service
            .create_stream_definition(definition("D1", json!({"temp": {"units": "F"}})))
            .await
            .expect_err("conflict");
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn null_schema_matches_empty_object() {
        let h = harness();
        let first = h
            .service
            .create_stream_definition(definition("empty", serde_json::Value::Null))
            .await
            .expect("create");
        let again = h
            .service
            .create_stream_definition(definition("empty", json!({})))
            .await
            .expect("dedupe");
        assert_eq!(first, again);
    }

    #[tokio::test]
    async fn empty_name_always_creates_a_new_definition() {
        let h = harness();
        let a = h
            .service
            .create_stream_definition(definition("", json!({})))
            .await
            .expect("a");
        let b = h
            .service
            .create_stream_definition(definition("", json!({})))
            .await
            .expect("b");
        assert_ne!(a, b);
        let read = h.service.read_stream_definition(&a).await.expect("read");
        assert!(!read.name.is_empty());
        assert_eq!(read.stream_type, "sample");
    }

    #[tokio::test]
    async fn compare_reports_schema_equivalence() {
        let h = harness();
        let a = h
            .service
            .create_stream_definition(definition("a", json!({"x": 1})))
            .await
            .expect("a");
        let b = h
            .service
            .create_stream_definition(definition("b", json!({"x": 1})))
            .await
            .expect("b");
        let c = h
            .service
            .create_stream_definition(definition("c", json!({"x": 2})))
            .await
            .expect("c");
        assert!(h.service.compare_stream_definitions(&a, &b).await.expect("cmp"));
        assert!(!h.service.compare_stream_definitions(&a, &c).await.expect("cmp"));
    }

    #[tokio::test]
    async fn streams_are_found_by_definition_and_delete_detaches() {
        let h = harness();
        let def = h
            .service
            .create_stream_definition(definition("ctd", json!({})))
            .await
            .expect("def");
        let mut request = stream("ctd_stream", "xp", &[]);
        request.stream_definition_id = Some(def);
        let (stream_id, _) = h.service.create_stream(request).await.expect("stream");
        assert_eq!(
            h.service.find_streams_by_definition(&def).await.expect("find"),
            vec![stream_id]
        );

        h.service.delete_stream_definition(&def).await.expect("delete");
        assert!(matches!(
            h.service.read_stream_definition(&def).await,
            Err(ServiceError::NotFound(_))
        ));
        let edges = h
            .service
            .catalog()
            .find_objects(&stream_id, Some(Predicate::HasStreamDefinition), None)
            .await
            .expect("edges");
        assert!(edges.is_empty());
    }
}
