//! CLI tool to create the DynamoDB tables for songs-api
//!
//! Usage:
//!   cargo run --bin setup_tables
//!
//! For local development with DynamoDB Local, optionally loading seed data:
//!   DYNAMODB_ENDPOINT_URL=http://localhost:8001 cargo run --bin setup_tables -- --seed-dir seed

use anyhow::{Context, Result};
use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, LocalSecondaryIndex, Projection,
    ProjectionType, ScalarAttributeType, WriteRequest,
};
use aws_sdk_dynamodb::Client;
use clap::Parser;
use songs_api::config::{create_dynamodb_client, Settings};
use songs_api::db::seed::put_request_batches;
use songs_api::db::SeedData;
use std::collections::HashMap;
use std::path::PathBuf;

/// Create DynamoDB tables for songs-api
#[derive(Parser, Debug)]
#[command(name = "setup_tables")]
#[command(about = "Create DynamoDB tables for songs-api")]
struct Args {
    /// DynamoDB endpoint URL (for local development)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Songs table name (overrides TABLE_NAME env var)
    #[arg(long)]
    songs_table: Option<String>,

    /// Song artists table name (overrides SONG_ARTISTS_TABLE_NAME env var)
    #[arg(long)]
    song_artists_table: Option<String>,

    /// Stage name index (overrides STAGE_NAME_INDEX env var)
    #[arg(long)]
    index: Option<String>,

    /// Directory with songs.json / song_artists.json to load after creation
    #[arg(long)]
    seed_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Settings::load reads .env as well
    let mut settings = Settings::load()?;
    if let Some(url) = args.endpoint_url {
        settings.dynamodb_endpoint_url = Some(url);
    }
    if let Some(name) = args.songs_table {
        settings.songs_table = name;
    }
    if let Some(name) = args.song_artists_table {
        settings.song_artists_table = name;
    }
    if let Some(name) = args.index {
        settings.stage_name_index = name;
    }

    if let Some(ref url) = settings.dynamodb_endpoint_url {
        println!("Using DynamoDB endpoint: {}", url);
    }

    let client = create_dynamodb_client(&settings).await;

    println!("\n🚀 Setting up DynamoDB tables...\n");

    report(
        &settings.songs_table,
        create_songs_table(&client, &settings.songs_table).await,
    );
    report(
        &settings.song_artists_table,
        create_song_artists_table(
            &client,
            &settings.song_artists_table,
            &settings.stage_name_index,
        )
        .await,
    );

    if let Some(dir) = args.seed_dir {
        let seed = SeedData::load(&dir)
            .with_context(|| format!("Failed to load seed data from {}", dir.display()))?;

        let songs = put_request_batches(seed.songs.iter().map(|s| s.to_dynamodb()))?;
        let written = write_batches(&client, &settings.songs_table, songs).await?;
        println!("🌱 Seeded {} songs into {}", written, settings.songs_table);

        let artists = put_request_batches(seed.artists.iter().map(|a| a.to_dynamodb()))?;
        let written = write_batches(&client, &settings.song_artists_table, artists).await?;
        println!("🌱 Seeded {} artists into {}", written, settings.song_artists_table);
    }

    println!("\n✅ Table setup complete!\n");

    Ok(())
}

fn report(table_name: &str, result: Result<bool>) {
    match result {
        Ok(true) => println!("✅ Created table: {}", table_name),
        Ok(false) => println!("⏭️  Table already exists: {}", table_name),
        Err(e) => println!("❌ Failed to create table {}: {:#}", table_name, e),
    }
}

async fn table_exists(client: &Client, table_name: &str) -> Result<bool> {
    let tables = client.list_tables().send().await?;
    Ok(tables.table_names().iter().any(|name| name == table_name))
}

async fn create_songs_table(client: &Client, table_name: &str) -> Result<bool> {
    if table_exists(client, table_name).await? {
        return Ok(false);
    }

    client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("id")
                .attribute_type(ScalarAttributeType::N)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("id")
                .key_type(KeyType::Hash)
                .build()?,
        )
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await?;

    Ok(true)
}

/// songId (hash) + artistName (range), with a local index sorting a song's
/// artists by stageName
async fn create_song_artists_table(
    client: &Client,
    table_name: &str,
    index_name: &str,
) -> Result<bool> {
    if table_exists(client, table_name).await? {
        return Ok(false);
    }

    let stage_name_index = LocalSecondaryIndex::builder()
        .index_name(index_name)
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("songId")
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("stageName")
                .key_type(KeyType::Range)
                .build()?,
        )
        .projection(
            Projection::builder()
                .projection_type(ProjectionType::All)
                .build(),
        )
        .build()?;

    client
        .create_table()
        .table_name(table_name)
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("songId")
                .attribute_type(ScalarAttributeType::N)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("artistName")
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .attribute_definitions(
            AttributeDefinition::builder()
                .attribute_name("stageName")
                .attribute_type(ScalarAttributeType::S)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("songId")
                .key_type(KeyType::Hash)
                .build()?,
        )
        .key_schema(
            KeySchemaElement::builder()
                .attribute_name("artistName")
                .key_type(KeyType::Range)
                .build()?,
        )
        .local_secondary_indexes(stage_name_index)
        .billing_mode(BillingMode::PayPerRequest)
        .send()
        .await?;

    Ok(true)
}

/// Write each batch once; unprocessed items are reported, not retried
async fn write_batches(
    client: &Client,
    table_name: &str,
    batches: Vec<Vec<WriteRequest>>,
) -> Result<usize> {
    let mut written = 0;

    for batch in batches {
        let size = batch.len();
        let output = client
            .batch_write_item()
            .set_request_items(Some(HashMap::from([(table_name.to_string(), batch)])))
            .send()
            .await
            .with_context(|| format!("Batch write to {} failed", table_name))?;

        let unprocessed = output
            .unprocessed_items()
            .and_then(|items| items.get(table_name))
            .map_or(0, |requests| requests.len());
        if unprocessed > 0 {
            println!("⚠️  {} items were not processed for {}", unprocessed, table_name);
        }

        written += size - unprocessed;
    }

    Ok(written)
}
