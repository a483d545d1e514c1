pub mod error;
pub mod models;
pub mod routes;
pub mod store;
pub mod validate;

use async_trait::async_trait;
use axum::Router;
use bookrate_db::Pool;
use bookrate_kernel::{InitCtx, Migration, Module};
use serde_json::json;

use store::BookStore;

/// Books catalogue: CRUD, search and filtering over the `book` table
pub struct BooksModule {
    store: BookStore,
}

impl BooksModule {
    pub fn new(store: BookStore) -> Self {
        Self { store }
    }
}

pub(crate) fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_init",
        up: r#"
            CREATE TABLE IF NOT EXISTS book (
                id      INTEGER PRIMARY KEY AUTOINCREMENT,
                title   TEXT    NOT NULL CHECK (length(trim(title)) > 0),
                author  TEXT    NOT NULL CHECK (length(trim(author)) > 0),
                rating  INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
                comment TEXT,
                genre   TEXT,
                status  TEXT
            );
            CREATE INDEX IF NOT EXISTS book_genre_status ON book (genre, status);
            CREATE INDEX IF NOT EXISTS book_rating ON book (rating);
            "#,
    }]
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.store.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi_fragment())
    }

    fn migrations(&self) -> Vec<Migration> {
        migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

fn error_response(description: &str) -> serde_json::Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}

fn json_response(description: &str, schema: serde_json::Value) -> serde_json::Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

fn query_param(name: &str, schema_type: &str, required: bool) -> serde_json::Value {
    json!({
        "name": name,
        "in": "query",
        "required": required,
        "schema": { "type": schema_type }
    })
}

fn openapi_fragment() -> serde_json::Value {
    let book = json!({ "$ref": "#/components/schemas/Book" });
    let book_list = json!({ "type": "array", "items": book });
    let book_input = json!({
        "required": true,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/BookInput" }
            }
        }
    });
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64" }
    });

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": "List books, optionally filtered by rating and genre",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("rating", "integer", false),
                        query_param("genre", "string", false)
                    ],
                    "responses": {
                        "200": json_response("List of books", book_list.clone()),
                        "400": error_response("Rating outside 1..=5")
                    }
                },
                "post": {
                    "summary": "Create a book",
                    "tags": ["Books"],
                    "requestBody": book_input.clone(),
                    "responses": {
                        "201": json_response("Created book", book.clone()),
                        "400": error_response("Validation error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": "Get a book by id",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": json_response("The book", book.clone()),
                        "404": error_response("Book not found")
                    }
                },
                "put": {
                    "summary": "Replace every field of a book",
                    "tags": ["Books"],
                    "parameters": [id_param.clone()],
                    "requestBody": book_input,
                    "responses": {
                        "200": json_response("Updated book", book),
                        "400": error_response("Validation error"),
                        "404": error_response("Book not found")
                    }
                },
                "delete": {
                    "summary": "Delete a book",
                    "tags": ["Books"],
                    "parameters": [id_param],
                    "responses": {
                        "204": { "description": "Deleted" },
                        "404": error_response("Book not found")
                    }
                }
            },
            "/search": {
                "get": {
                    "summary": "Case-insensitive search over title and author",
                    "tags": ["Books"],
                    "parameters": [query_param("query", "string", true)],
                    "responses": {
                        "200": json_response("Matching books", book_list.clone()),
                        "400": error_response("Empty query")
                    }
                }
            },
            "/filter": {
                "get": {
                    "summary": "Filter books by genre and status",
                    "tags": ["Books"],
                    "parameters": [
                        query_param("genre", "string", false),
                        query_param("status", "string", false)
                    ],
                    "responses": {
                        "200": json_response("Matching books", book_list)
                    }
                }
            },
            "/health": {
                "get": {
                    "summary": "Books health check",
                    "tags": ["Books"],
                    "responses": {
                        "200": {
                            "description": "OK",
                            "content": { "text/plain": { "schema": { "type": "string" } } }
                        }
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Book": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "integer", "format": "int64" },
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": ["string", "null"] },
                        "genre": { "type": ["string", "null"] },
                        "status": { "type": ["string", "null"] }
                    },
                    "required": ["id", "title", "author", "rating"]
                },
                "BookInput": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "author": { "type": "string" },
                        "rating": { "type": "integer", "minimum": 1, "maximum": 5 },
                        "comment": { "type": ["string", "null"] },
                        "genre": {
                            "type": ["string", "null"],
                            "description": "Defaults to \"Unbekannt\" on create"
                        },
                        "status": {
                            "type": ["string", "null"],
                            "description": "Defaults to \"Unbekannt\" on create"
                        }
                    },
                    "required": ["title", "author", "rating"]
                }
            }
        }
    })
}

/// Create a new instance of the books module over the given pool
pub fn create_module(pool: Pool) -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new(BookStore::new(pool)))
}
