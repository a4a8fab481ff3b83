//! GraphQL query-string construction.
//!
//! Collection queries are named `all_<schema id>` and take pagination,
//! ordering, and a `meta.documentId.notIn` filter. Both schemas order by
//! their `timestamp` field. Creates go through one mutation with the
//! fields object passed as a variable, so field values never need GraphQL
//! literal escaping.

use spriteboard_protocol::schema::{SPRITE_IMAGES_SCHEMA_ID, SPRITES_SCHEMA_ID};
use spriteboard_protocol::{OrderDirection, QueryArgs};

pub(crate) const CREATE_DOCUMENT_MUTATION: &str = "\
mutation CreateDocument($schemaId: String!, $fields: DocumentFields!) {
  createDocument(schemaId: $schemaId, fields: $fields) {
    documentId
  }
}";

/// Name of the collection query for a schema.
pub(crate) fn collection_name(schema_id: &str) -> String {
    format!("all_{schema_id}")
}

/// Query for sprite documents, with the referenced image's fields and meta
/// nested inline so one round trip fully resolves each record.
pub(crate) fn sprites_query(args: &QueryArgs) -> String {
    paginated_query(
        SPRITES_SCHEMA_ID,
        args,
        "{ cursor \
           fields { colour pos_x pos_y timestamp \
             img { fields { description timestamp blob { meta { documentId } } } \
                   meta { documentId } } } \
           meta { documentId } }",
    )
}

/// Query for sprite image documents.
pub(crate) fn sprite_images_query(args: &QueryArgs) -> String {
    paginated_query(
        SPRITE_IMAGES_SCHEMA_ID,
        args,
        "{ cursor \
           fields { description timestamp blob { meta { documentId } } } \
           meta { documentId } }",
    )
}

fn paginated_query(schema_id: &str, args: &QueryArgs, fields: &str) -> String {
    let mut params = vec![
        "orderBy: timestamp".to_string(),
        format!("orderDirection: {}", direction_keyword(args.direction)),
    ];
    if let Some(first) = args.first {
        params.push(format!("first: {first}"));
    }
    if let Some(after) = &args.after {
        params.push(format!("after: \"{after}\""));
    }
    if !args.not_in.is_empty() {
        let ids: Vec<String> = args
            .not_in
            .iter()
            .map(|id| format!("\"{id}\""))
            .collect();
        params.push(format!(
            "meta: {{ documentId: {{ notIn: [{}] }} }}",
            ids.join(", ")
        ));
    }

    format!(
        "query {{ {name}({params}) {{ totalCount hasNextPage endCursor documents {fields} }} }}",
        name = collection_name(schema_id),
        params = params.join(", "),
    )
}

fn direction_keyword(direction: OrderDirection) -> &'static str {
    match direction {
        OrderDirection::Ascending => "ASC",
        OrderDirection::Descending => "DESC",
    }
}

#[cfg(test)]
mod tests {
    use spriteboard_protocol::DocumentId;

    use super::*;

    #[test]
    fn sprites_query_carries_pagination_and_exclusions() {
        let args = QueryArgs::first(10)
            .after("cursor-x")
            .excluding([DocumentId::from("0020a"), DocumentId::from("0020b")]);
        let query = sprites_query(&args);

        assert!(query.contains(&collection_name(SPRITES_SCHEMA_ID)));
        assert!(query.contains("first: 10"));
        assert!(query.contains("after: \"cursor-x\""));
        assert!(query.contains("orderDirection: ASC"));
        assert!(query.contains("notIn: [\"0020a\", \"0020b\"]"));
        // Nested image resolution must be requested up front.
        assert!(query.contains("img { fields"));
    }

    #[test]
    fn empty_exclusion_set_omits_the_filter() {
        let query = sprites_query(&QueryArgs::first(10));
        assert!(!query.contains("notIn"));
    }

    #[test]
    fn image_query_orders_descending() {
        let query = sprite_images_query(&QueryArgs::first(1).descending());
        assert!(query.contains(&collection_name(SPRITE_IMAGES_SCHEMA_ID)));
        assert!(query.contains("orderDirection: DESC"));
        assert!(query.contains("first: 1"));
        assert!(!query.contains("after:"));
    }
}
