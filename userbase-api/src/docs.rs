//! OpenAPI description of the `/api` routes and the Swagger UI page that
//! renders it.

use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::{json, Value};
use userbase_app::AppContext;

pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

pub async fn openapi_json(State(ctx): State<AppContext>) -> Json<Value> {
    Json(openapi_document(&ctx.config.public_base_url))
}

pub async fn swagger_ui() -> Html<String> {
    Html(render_swagger_page(OPENAPI_PATH))
}

pub fn openapi_document(public_base_url: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "User CRUD API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "API documentation for User CRUD operations"
        },
        "servers": [
            { "url": format!("{}/api", public_base_url), "description": "Local server" }
        ],
        "tags": [
            { "name": "Users", "description": "User management APIs" }
        ],
        "components": {
            "schemas": {
                "User": user_schema(),
                "UserProfile": profile_schema(),
                "Failure": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "integer", "example": 400 },
                        "message": { "type": "string" },
                        "error": { "type": "boolean", "example": true }
                    }
                },
                "UploadFailure": {
                    "type": "object",
                    "properties": {
                        "err_code": { "type": "string", "example": "LIMIT_FILE_SIZE" },
                        "err_message": { "type": "string", "example": "File too large" }
                    }
                }
            }
        },
        "paths": {
            "/create-user": create_user_path(),
            "/single-user/{id}": single_user_path(),
            "/update-user/{id}": update_user_path(),
            "/delete-user/{id}": delete_user_path(),
            "/allusers": all_users_path(),
            "/checkemailexists": check_email_path()
        }
    })
}

fn create_user_path() -> Value {
    json!({
        "post": {
            "summary": "Create a new user",
            "tags": ["Users"],
            "requestBody": {
                "required": true,
                "content": { "multipart/form-data": { "schema": user_form_schema(true) } }
            },
            "responses": {
                "200": envelope_response("User created successfully", json!({ "$ref": "#/components/schemas/User" })),
                "400": failure_response("Validation failed"),
                "418": upload_failure_response()
            }
        }
    })
}

fn single_user_path() -> Value {
    json!({
        "get": {
            "summary": "Get a single user by ID",
            "tags": ["Users"],
            "parameters": [id_parameter()],
            "responses": {
                "200": envelope_response("User fetched successfully", json!({ "$ref": "#/components/schemas/UserProfile" })),
                "400": failure_response("Malformed user id"),
                "404": failure_response("User not found")
            }
        }
    })
}

fn update_user_path() -> Value {
    json!({
        "put": {
            "summary": "Update a user by ID",
            "tags": ["Users"],
            "parameters": [id_parameter()],
            "requestBody": {
                "required": true,
                "content": { "multipart/form-data": { "schema": user_form_schema(false) } }
            },
            "responses": {
                "200": envelope_response("User updated successfully", json!({ "$ref": "#/components/schemas/User" })),
                "400": failure_response("Validation failed"),
                "404": failure_response("User not found"),
                "418": upload_failure_response()
            }
        }
    })
}

fn delete_user_path() -> Value {
    json!({
        "delete": {
            "summary": "Delete a user by ID",
            "tags": ["Users"],
            "parameters": [id_parameter()],
            "responses": {
                "200": envelope_response("User deleted successfully", json!({
                    "type": "object",
                    "properties": { "deletedCount": { "type": "integer", "example": 1 } }
                })),
                "404": failure_response("User not found")
            }
        }
    })
}

fn all_users_path() -> Value {
    json!({
        "get": {
            "summary": "Get all users",
            "tags": ["Users"],
            "responses": {
                "200": envelope_response("List of all users, newest first", json!({
                    "type": "array",
                    "items": { "$ref": "#/components/schemas/User" }
                }))
            }
        }
    })
}

fn check_email_path() -> Value {
    json!({
        "post": {
            "summary": "Check if an email already exists",
            "tags": ["Users"],
            "requestBody": {
                "required": true,
                "content": {
                    "application/json": {
                        "schema": {
                            "type": "object",
                            "required": ["email"],
                            "properties": { "email": { "type": "string" } }
                        }
                    }
                }
            },
            "responses": {
                "200": envelope_response("Email check result", json!({
                    "type": "object",
                    "properties": { "exists": { "type": "boolean" } }
                })),
                "400": failure_response("Email missing")
            }
        }
    })
}

fn user_schema() -> Value {
    json!({
        "type": "object",
        "required": ["firstName", "lastName", "phoneNumber", "email"],
        "properties": {
            "_id": { "type": "string", "format": "uuid", "description": "Auto-generated user ID" },
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "phoneNumber": { "type": "string" },
            "email": { "type": "string" },
            "isActive": { "type": "boolean", "default": true },
            "avatar": { "type": "string", "description": "Stored image path, empty when none" },
            "imageUrl": { "type": "string", "description": "Public image URL, only present with an avatar" },
            "createdAt": { "type": "string", "format": "date-time" },
            "updatedAt": { "type": "string", "format": "date-time" }
        },
        "example": {
            "_id": "0192a0c4-5f1e-7c3a-9b7e-2f5d8c1e4a60",
            "firstName": "John",
            "lastName": "Doe",
            "phoneNumber": "9876543210",
            "email": "john@example.com",
            "isActive": true,
            "avatar": "Storage/images/john.png",
            "imageUrl": "http://localhost:3000/uploads/john.png"
        }
    })
}

fn profile_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "phoneNumber": { "type": "string" },
            "email": { "type": "string" },
            "isActive": { "type": "boolean" },
            "imageUrl": { "type": "string", "description": "Empty when the user has no avatar" }
        }
    })
}

fn user_form_schema(create: bool) -> Value {
    let mut schema = json!({
        "type": "object",
        "properties": {
            "firstName": { "type": "string" },
            "lastName": { "type": "string" },
            "phoneNumber": { "type": "string" },
            "email": { "type": "string" },
            "isActive": { "type": "boolean" },
            "avatar": { "type": "string", "format": "binary" }
        }
    });
    if create {
        schema["required"] = json!(["firstName", "lastName", "phoneNumber", "email"]);
    }
    schema
}

fn id_parameter() -> Value {
    json!({
        "in": "path",
        "name": "id",
        "required": true,
        "schema": { "type": "string", "format": "uuid" }
    })
}

fn envelope_response(description: &str, data: Value) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": {
                    "type": "object",
                    "properties": {
                        "status": { "type": "integer", "example": 200 },
                        "message": { "type": "string" },
                        "data": data
                    }
                }
            }
        }
    })
}

fn failure_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/Failure" } }
        }
    })
}

fn upload_failure_response() -> Value {
    json!({
        "description": "Upload rejected",
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/UploadFailure" } }
        }
    })
}

fn render_swagger_page(spec_url: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>User CRUD API - Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.ui = SwaggerUIBundle({{
            url: '{spec_url}',
            dom_id: '#swagger-ui',
            deepLinking: false
        }});
    </script>
</body>
</html>"#, spec_url = spec_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = openapi_document("http://localhost:3000");
        let paths = doc["paths"].as_object().unwrap();
        for path in [
            "/create-user",
            "/single-user/{id}",
            "/update-user/{id}",
            "/delete-user/{id}",
            "/allusers",
            "/checkemailexists",
        ] {
            assert!(paths.contains_key(path), "missing {}", path);
        }
        assert_eq!(doc["servers"][0]["url"], "http://localhost:3000/api");
    }

    #[test]
    fn test_only_create_requires_fields() {
        assert!(user_form_schema(true).get("required").is_some());
        assert!(user_form_schema(false).get("required").is_none());
    }

    #[test]
    fn test_swagger_page_points_at_document() {
        let page = render_swagger_page(OPENAPI_PATH);
        assert!(page.contains("url: '/api-docs/openapi.json'"));
        assert!(page.contains("deepLinking: false"));
    }
}
