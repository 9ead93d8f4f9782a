//! People directory demo: generate resolvers for a schema and run operations
//! against the in-memory store.
//!
//! Run with `RUST_LOG=sheetql=debug` to watch resolver generation and the
//! store calls issued by each operation.

use sheetql::prelude::*;

const SCHEMA: &str = r#"
    type Person {
      id: String!
      firstName: String
      lastName: String
      father: Person
      siblings: [Person]
    }

    type Query {
      person(id: String!): Person
      people: [Person]
    }

    input PersonInput {
      id: String
      firstName: String
      lastName: String
    }

    type Mutation {
      createPerson(person: PersonInput): Person
      updatePerson(person: PersonInput): Person
      deletePerson(id: String!): Person
    }
"#;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("sheetql=info");

    let config = match std::env::args().nth(1) {
        Some(path) => GeneratorConfig::from_yaml_file(&path)?,
        None => GeneratorConfig::default(),
    };
    let store = InMemoryRecordStore::from_config(&config);
    let executor = GraphQLExecutor::from_store(
        Schema::from_sdl(SCHEMA)?,
        Arc::new(store.clone()),
        config,
    )?;
    println!("Resolvers: {:?}\n", executor.resolvers());

    let created = executor
        .execute_to_response(
            r#"mutation {
                createPerson(person: {
                  id: "taras",
                  firstName: "Taras",
                  father: {id: "serge", firstName: "Serge"},
                  siblings: [{id: "lida", firstName: "Lida"}, {id: "ivan", firstName: "Ivan"}]
                }) {
                  id
                  father { id }
                  siblings { id }
                }
            }"#,
            None,
        )
        .await;
    println!("Created:\n{}\n", serde_json::to_string_pretty(&created)?);

    // The spreadsheet maintains the ledger; here we fill it in by hand
    store.link(RelationshipKey::new("Person", "taras", "Person", "father"), "serge")?;
    for sibling in ["lida", "ivan"] {
        store.link(RelationshipKey::new("Person", "taras", "Person", "siblings"), sibling)?;
    }

    let family = executor
        .execute_to_response(
            r#"{
                person(id: "taras") {
                  __typename
                  firstName
                  dad: father { firstName }
                  siblings { firstName }
                }
            }"#,
            None,
        )
        .await;
    println!("Family:\n{}\n", serde_json::to_string_pretty(&family)?);

    let failed = executor
        .execute_to_response("{ person { id } }", None)
        .await;
    println!("Missing id:\n{}", serde_json::to_string_pretty(&failed)?);

    Ok(())
}
