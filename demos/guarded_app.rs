//! Guarded routes rendering tera templates
//!
//! Run with `cargo run --example guarded_app`, then:
//!
//! ```text
//! curl -i localhost:3000/items?paginate=true
//! curl -i localhost:3000/items?paginate=false
//! curl -i -H 'X-Requested-With: XMLHttpRequest' localhost:3000/poll
//! curl -i -d 'name=Ada&address=London' localhost:3000/contact
//! ```

use axum::Form;
use axum::extract::State;
use axum::response::Html;
use extras::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const PAGE: &str = r#"<h1>{{ title | camel2hyphen }}</h1>
<p>{{ greet(value=visitor, greeting="Welcome") }}</p>
<p>{{ created | dt_format(fmt="%d %B %Y") }}</p>"#;

const GUARDS: &str = r#"
headers: [X-Api-Key]
cookies: [session]
"#;

#[derive(Clone)]
struct AppState {
    tera: Arc<Tera>,
}

async fn list_items(State(state): State<AppState>) -> Result<Html<String>, ExtrasError> {
    let mut ctx = Context::new();
    ctx.insert("title", "itemList");
    ctx.insert("visitor", "guest");
    ctx.insert("created", "2024-01-15");
    Ok(Html(state.tera.render("page.html", &ctx)?))
}

async fn poll() -> &'static str {
    "{\"pending\": 0}"
}

async fn contact(Form(form): Form<HashMap<String, String>>) -> String {
    format!(
        "Thanks {}, we will write to {}",
        form.get("name").map(String::as_str).unwrap_or_default(),
        form.get("address").map(String::as_str).unwrap_or_default()
    )
}

async fn admin() -> &'static str {
    "admin area"
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,extras=debug")),
        )
        .init();

    let mut tera = TemplateConfig::default().build_engine()?;
    tera.add_raw_template("page.html", PAGE)?;

    let state = AppState {
        tera: Arc::new(tera),
    };

    let app = Router::new()
        .route(
            "/items",
            get(list_items).route_layer(require_arg_values([("paginate", "true")])),
        )
        .route("/poll", get(poll).route_layer(xhr_only()))
        .route(
            "/contact",
            post(contact).route_layer(require_form(["name", "address"])),
        )
        .route(
            "/admin",
            get(admin).route_layer(GuardConfig::from_yaml_str(GUARDS)?.into_layer()?),
        )
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
