//! Create a record and read it back.
//!
//! Configuration is read the usual way (`FMDATA_*` variables, `.env`, or a
//! `config.{json,toml}` / `fmdata.{json,toml}` file). The target layout
//! defaults to the auth layout and can be overridden with `FMDATA_DEMO_LAYOUT`.
//!
//! ```sh
//! FMDATA_FMS_URL=https://fms.example.com/fmi/rest/api/ \
//! FMDATA_SOLUTION=Tasks FMDATA_USERNAME=admin FMDATA_PASSWORD=secret \
//! FMDATA_AUTH_LAYOUT=Tasks \
//! cargo run -p fmdata-infra --example fms_roundtrip
//! ```

use anyhow::Context;
use fmdata_infra::{config, init_tracing, FmDataService};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load().context("loading configuration")?;
    init_tracing(&config.logging)?;

    let layout =
        std::env::var("FMDATA_DEMO_LAYOUT").unwrap_or_else(|_| config.fms.auth_layout.clone());

    let service = FmDataService::connect(&config)?;
    let client = service.client();

    let id = client
        .new_record(&layout, &json!({ "Name": "fmdata roundtrip" }))
        .await
        .context("creating record")?;
    tracing::info!(record_id = %id, layout = %layout, "record created");

    let record = client.get_record(&layout, &id).await.context("reading record back")?;
    tracing::info!(
        record_id = %record.record_id,
        mod_id = ?record.mod_id,
        fields = %serde_json::Value::Object(record.field_data.clone()),
        "record read back"
    );

    let stored = service.token_store().count().await?;
    tracing::info!(stored_tokens = stored, "done");

    Ok(())
}
