//! Calls every endpoint once against a live server.
//!
//! ```text
//! DATENO_APIKEY=... cargo run --example smoke
//! DATENO_SERVER_URL=http://127.0.0.1:8100 DATENO_APIKEY=... cargo run --example smoke
//! ```

use dateno::models::{
    FacetValuesParams, ListCatalogsParams, SearchDslParams, SearchParams, SimilarParams,
    StatsListParams,
};
use dateno::DatenoBuilder;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dateno=info")),
        )
        .init();

    let api_key = std::env::var(dateno::config::ENV_API_KEY).unwrap_or_default();
    if api_key.is_empty() {
        eprintln!("ERROR: {} is required", dateno::config::ENV_API_KEY);
        std::process::exit(2);
    }

    let sdk = DatenoBuilder::from_env().build()?;
    println!("Using server_url={}", sdk.config().get_server_details()?);

    let health = sdk.service().get_healthz(None).await?;
    assert!(
        health.data.is_ok(),
        "healthz: expected status=ok, got {:?}",
        health.data
    );
    println!("[OK] service.get_healthz");

    let catalogs = sdk.data_catalogs();
    catalogs.get_catalog_by_id("cdi00001616", None).await?;
    println!("[OK] data_catalogs.get_catalog_by_id");

    let found = catalogs
        .list_catalogs(
            &ListCatalogsParams {
                q: Some("environment".into()),
                limit: Some(10),
                offset: Some(0),
            },
            None,
        )
        .await?;
    println!(
        "[OK] data_catalogs.list_catalogs (data={})",
        found.data.data.len()
    );

    let search = sdk.search();
    let params = SearchParams {
        q: Some("environment".into()),
        limit: Some(1),
        offset: Some(0),
        facets: Some(true),
        sort_by: Some("_score".into()),
    };
    let query = search.search_datasets(&params, None).await?;
    println!("[OK] search.search_datasets");

    let entry_id = query
        .data
        .hits
        .hits
        .first()
        .map(|h| h.id.clone())
        .unwrap_or_else(|| {
            "89dab920d0ff1f03ae44885e7ff021358cb0f531cc81b61579f06b0d4ff4ee28".into()
        });

    search.get_dataset_by_entry_id(&entry_id, None).await?;
    println!("[OK] search.get_dataset_by_entry_id");

    let dsl = SearchDslParams {
        limit: Some(1),
        offset: Some(0),
        facets: Some(true),
        sortby: Some("_score".into()),
    };
    search
        .search_datasets_dsl(&dsl, Some(&json!({"query": {"match_all": {}}})), None)
        .await?;
    println!("[OK] search.search_datasets_dsl");

    search.list_search_facets(None).await?;
    println!("[OK] search.list_search_facets");

    search
        .get_search_facet_values(
            &FacetValuesParams {
                key: "source.catalog_type".into(),
            },
            None,
        )
        .await?;
    println!("[OK] search.get_search_facet_values");

    search
        .get_similar_datasets(&entry_id, &SimilarParams { limit: Some(5) }, None)
        .await?;
    println!("[OK] search.get_similar_datasets");

    sdk.raw_data_access()
        .get_raw_entry_by_id(&entry_id, None, None)
        .await?;
    println!("[OK] raw_data_access.get_raw_entry_by_id");

    let stats = sdk.statistics();
    let first_page = StatsListParams {
        start: None,
        limit: Some(10),
    };

    let namespaces = stats.list_namespaces(&first_page, None).await?;
    let ns_id = namespaces
        .items
        .first()
        .map_or("ilostat", |ns| ns.id.as_str())
        .to_string();
    println!("[OK] statistics.list_namespaces");

    stats.get_namespace(&ns_id, None).await?;
    println!("[OK] statistics.get_namespace");

    let tables = stats
        .list_namespace_tables(&ns_id, &first_page, None)
        .await?;
    let table_id = tables
        .items
        .first()
        .map_or("CCF_XOXR_CUR_RT_A", |t| t.id.as_str());
    stats.get_namespace_table(&ns_id, table_id, None).await?;
    println!("[OK] statistics.get_namespace_table");

    let indicators = stats.list_indicators(&ns_id, &first_page, None).await?;
    let ind_id = indicators
        .items
        .first()
        .map_or("CLD_TPOP_SEX_AGE_NB", |i| i.id.as_str());
    stats.get_namespace_indicator(&ns_id, ind_id, None).await?;
    println!("[OK] statistics.get_namespace_indicator");

    let series = stats.list_timeseries(&ns_id, &first_page, None).await?;
    let ts_id = series
        .items
        .first()
        .map_or("CCF_XOXR_CUR_RT.ABW", |t| t.id.as_str());
    stats.get_timeseries(&ns_id, ts_id, None).await?;
    println!("[OK] statistics.get_timeseries");

    stats.list_export_formats(None).await?;
    println!("[OK] statistics.list_export_formats");

    println!("\nALL OK");
    Ok(())
}
