//! Media catalogue command handlers

use anyhow::Context;
use serde_json::Value;

use crate::config::Config;
use crate::db::{MediaQuery, Store};
use crate::domain::{FieldMap, LinkKind, Media, MediaDetails, MediaId, MediaKind};
use crate::services::{MediaService, SeaOrmMediaService};

async fn media_service(config: &Config) -> anyhow::Result<SeaOrmMediaService> {
    let store = Store::new(&config.general.database_path).await?;
    Ok(SeaOrmMediaService::new(store))
}

/// `key=value` pairs; values that parse as JSON (numbers, booleans, null)
/// keep that type, anything else is a string.
fn parse_fields(title: &str, pairs: &[String]) -> anyhow::Result<FieldMap> {
    let mut fields = FieldMap::new();
    fields.insert("title".to_string(), Value::String(title.to_string()));

    for pair in pairs {
        let (key, raw) = pair
            .split_once('=')
            .with_context(|| format!("Expected KEY=VALUE, got '{pair}'"))?;
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        fields.insert(key.trim().to_string(), value);
    }

    Ok(fields)
}

fn describe(media: &Media) -> String {
    let status = match &media.details {
        MediaDetails::Film { release_status, .. } => format!("{release_status:?}"),
        MediaDetails::Series { airing_status, .. } => format!("{airing_status:?}"),
        MediaDetails::Book { release_status, .. } => format!("{release_status:?}"),
    };
    format!(
        "[{}] {} ({}) | Score: {:.2} | Members: {} | {}",
        media.id,
        media.title(),
        media.kind(),
        media.base.score,
        media.base.members,
        status
    )
}

pub async fn cmd_add_media(
    config: &Config,
    kind: &str,
    title: &str,
    pairs: &[String],
) -> anyhow::Result<()> {
    let kind: MediaKind = kind.parse().map_err(anyhow::Error::msg)?;
    let fields = parse_fields(title, pairs)?;

    let media = media_service(config)
        .await?
        .create_media(kind, fields)
        .await?;

    println!("Added {}", describe(&media));
    Ok(())
}

pub async fn cmd_list_media(
    config: &Config,
    kind: Option<&str>,
    query: Option<String>,
) -> anyhow::Result<()> {
    let kind = kind
        .map(str::parse::<MediaKind>)
        .transpose()
        .map_err(anyhow::Error::msg)?;

    let page = media_service(config)
        .await?
        .list(MediaQuery {
            kind,
            title: query,
            page: 0,
            page_size: 100,
        })
        .await?;

    if page.items.is_empty() {
        println!("No media found.");
        println!();
        println!("Add media with: mymedialist add-media film --title \"2001: A Space Odyssey\" --set release_status=released");
        return Ok(());
    }

    println!("Media ({} total)", page.total);
    println!("{:-<70}", "");
    for media in &page.items {
        println!("{}", describe(media));
    }

    Ok(())
}

pub async fn cmd_relate(
    config: &Config,
    subject: i32,
    other: i32,
    kind: &str,
    remove: bool,
) -> anyhow::Result<()> {
    let service = media_service(config).await?;
    let subject = MediaId::new(subject);
    let other = MediaId::new(other);

    if remove {
        service.delete_related(subject, other).await?;
        println!("Removed link between {subject} and {other}");
        return Ok(());
    }

    let kind: LinkKind = kind.parse().map_err(anyhow::Error::msg)?;
    let edge = service.link(subject, other, kind).await?;
    println!(
        "Linked {} -> {} ({:?})",
        edge.media1, edge.media2, edge.relationship
    );
    Ok(())
}

pub async fn cmd_show_media(config: &Config, id: i32) -> anyhow::Result<()> {
    let relations = media_service(config)
        .await?
        .relations(MediaId::new(id))
        .await?;

    println!("{}", describe(&relations.media));
    if let Some(local) = &relations.media.base.local_title {
        println!("  Local title: {local}");
    }
    if let Some(description) = &relations.media.base.description {
        println!("  {description}");
    }

    for (label, items) in [
        ("Prequels", &relations.prequels),
        ("Sequels", &relations.sequels),
        ("Related", &relations.related),
    ] {
        if items.is_empty() {
            continue;
        }
        println!();
        println!("{label}:");
        for media in items {
            println!("  {}", describe(media));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_fields_keeps_json_types() {
        let fields = parse_fields(
            "Arrival",
            &["runtime=116".to_string(), "release_status=released".to_string()],
        )
        .unwrap();

        assert_eq!(fields["title"], Value::String("Arrival".to_string()));
        assert_eq!(fields["runtime"], Value::from(116));
        assert_eq!(fields["release_status"], Value::String("released".to_string()));
    }

    #[test]
    fn parse_fields_rejects_bare_keys() {
        assert!(parse_fields("Arrival", &["runtime".to_string()]).is_err());
    }
}
