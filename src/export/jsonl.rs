//! JSONL export functionality.
//!
//! Exports domain_status data to JSONL (JSON Lines) format.
//! Each line is a complete JSON object representing one URL scan result.
//! This format is ideal for programmatic processing, piping to jq, or loading into databases.

use anyhow::{Context, Result};
use futures::TryStreamExt;
use serde_json::{json, Value};
use std::io::{self, Write};

use crate::storage::init_db_pool_with_path;

use super::queries::{build_where_clause, IgnoreBrokenPipe};
use super::row::{
    build_export_row, build_url, extract_main_row_data, parse_headers, parse_key_value_pairs,
    parse_string_list, parse_technologies,
};

/// Exports data to JSONL format (JSON Lines).
///
/// Each line is a complete JSON object with all fields for one URL scan result.
/// This format preserves nested structures better than CSV and is ideal for:
/// - Piping to `jq` for filtering/transformation
/// - Loading into databases (MongoDB, Elasticsearch, etc.)
/// - Programmatic processing in scripts
///
/// # Arguments
///
/// * `opts` - Export options including database path, output, and filters
///
/// # Returns
///
/// Returns the number of records exported, or an error if export fails.
#[allow(clippy::too_many_lines)]
pub async fn export_jsonl(opts: &super::ExportOptions) -> Result<usize> {
    let pool = init_db_pool_with_path(&opts.db_path, 5)
        .await
        .context("Failed to initialize database pool")?;

    let mut query_builder = sqlx::QueryBuilder::new(
        "SELECT us.id, us.initial_domain, us.final_domain, us.ip_address, us.reverse_dns_name,
                us.http_status, us.http_status_text, us.response_time_seconds, us.title, us.keywords,
                us.description, us.is_mobile_friendly, us.tls_version, us.ssl_cert_subject,
                us.ssl_cert_issuer, us.ssl_cert_valid_to_ms, us.cipher_suite, us.key_algorithm,
                us.spf_record, us.dmarc_record, us.observed_at_ms, us.run_id
         FROM url_status us",
    );

    build_where_clause(
        &mut query_builder,
        opts.run_id.as_deref(),
        opts.domain.as_deref(),
        opts.status,
        opts.since,
    );

    query_builder.push(" ORDER BY us.observed_at_ms DESC");

    let mut writer: Box<dyn Write> = if let Some(output_path) = opts.output.as_ref() {
        let file = tokio::fs::File::create(output_path)
            .await
            .context(format!(
                "Failed to create output file: {}",
                output_path.display()
            ))?
            .into_std()
            .await;
        Box::new(file)
    } else {
        Box::new(IgnoreBrokenPipe::new(io::stdout()))
    };

    let query = query_builder.build();
    let mut rows = query.fetch(pool.as_ref());

    let mut record_count = 0;

    while let Some(row) = rows.try_next().await? {
        // Extract main row data and build the complete export row
        let main = extract_main_row_data(&row);
        let export_row = build_export_row(&pool, main).await?;

        // Build URL
        let url = build_url(&export_row.main.final_domain);

        // Convert redirects to JSON array
        let redirect_chain: Vec<Value> = export_row
            .redirects
            .iter()
            .map(|r| {
                json!({
                    "redirect_url": r.redirect_url,
                    "sequence_order": r.sequence_order,
                })
            })
            .collect();

        // Parse technologies into JSON array
        let technologies: Vec<Value> = parse_technologies(&export_row.technologies_str)
            .into_iter()
            .map(|(name, version)| {
                json!({
                    "name": name,
                    "version": version.map(Value::String).unwrap_or(Value::Null)
                })
            })
            .collect();

        // Parse certificate SANs
        let certificate_sans = parse_string_list(&export_row.certificate_sans_str);

        // Parse OIDs
        let oids = parse_string_list(&export_row.oids_str);

        // Parse analytics IDs into JSON array
        let analytics_ids: Vec<Value> = parse_key_value_pairs(&export_row.analytics_ids_str)
            .into_iter()
            .map(|(provider, tracking_id)| {
                json!({
                    "provider": provider,
                    "tracking_id": tracking_id
                })
            })
            .collect();

        // Parse social media links into JSON array
        let social_media_links: Vec<Value> =
            parse_key_value_pairs(&export_row.social_media_links_str)
                .into_iter()
                .map(|(platform, url)| {
                    json!({
                        "platform": platform,
                        "url": url
                    })
                })
                .collect();

        // Parse security warnings
        let security_warnings = parse_string_list(&export_row.security_warnings_str);

        // Parse structured data types
        let structured_data_types = parse_string_list(&export_row.structured_data_types_str);

        // Parse headers
        let http_headers = parse_headers(&export_row.http_headers_str);
        let security_headers = parse_headers(&export_row.security_headers_str);

        // Build GeoIP JSON (or null if no data)
        let geoip = if export_row.geoip.country_code.is_some()
            || export_row.geoip.asn.is_some()
            || export_row.geoip.latitude.is_some()
        {
            Some(json!({
                "country_code": export_row.geoip.country_code,
                "country_name": export_row.geoip.country_name,
                "region": export_row.geoip.region,
                "city": export_row.geoip.city,
                "latitude": export_row.geoip.latitude,
                "longitude": export_row.geoip.longitude,
                "asn": export_row.geoip.asn,
                "asn_org": export_row.geoip.asn_org,
            }))
        } else {
            None
        };

        // Build WHOIS JSON (or null if no data)
        let whois = if export_row.whois.registrar.is_some()
            || export_row.whois.creation_date_ms.is_some()
        {
            Some(json!({
                "registrar": export_row.whois.registrar,
                "creation_date_ms": export_row.whois.creation_date_ms,
                "expiration_date_ms": export_row.whois.expiration_date_ms,
                "registrant_country": export_row.whois.registrant_country,
            }))
        } else {
            None
        };

        // Build the complete JSON object
        let json_obj = json!({
            "url": url,
            "initial_domain": export_row.main.initial_domain,
            "final_domain": export_row.main.final_domain,
            "ip_address": export_row.main.ip_address,
            "reverse_dns": export_row.main.reverse_dns,
            "status": export_row.main.status,
            "status_description": export_row.main.status_desc,
            "response_time_ms": export_row.main.response_time,
            "title": export_row.main.title,
            "keywords": export_row.main.keywords,
            "description": export_row.main.description,
            "is_mobile_friendly": export_row.main.is_mobile_friendly,
            "redirect_chain": redirect_chain,
            "redirect_count": export_row.redirect_count,
            "final_redirect_url": export_row.final_redirect_url,
            "technologies": technologies,
            "technology_count": export_row.technology_count,
            "tls": {
                "version": export_row.main.tls_version,
                "certificate": {
                    "subject": export_row.main.ssl_cert_subject,
                    "issuer": export_row.main.ssl_cert_issuer,
                    "valid_to": export_row.main.ssl_cert_valid_to_ms,
                    "sans": certificate_sans,
                    "san_count": export_row.certificate_san_count,
                    "oids": oids,
                },
                "cipher_suite": export_row.main.cipher_suite,
                "key_algorithm": export_row.main.key_algorithm,
            },
            "dns": {
                "nameserver_count": export_row.nameserver_count,
                "txt_record_count": export_row.txt_count,
                "mx_record_count": export_row.mx_count,
            },
            "spf_record": export_row.main.spf_record,
            "dmarc_record": export_row.main.dmarc_record,
            "analytics_ids": analytics_ids,
            "analytics_count": export_row.analytics_count,
            "social_media_links": social_media_links,
            "social_media_count": export_row.social_media_count,
            "security_warnings": security_warnings,
            "security_warning_count": export_row.security_warning_count,
            "structured_data": {
                "types": structured_data_types,
                "count": export_row.structured_data_count,
            },
            "http_headers": http_headers,
            "http_header_count": export_row.http_header_count,
            "security_headers": security_headers,
            "security_header_count": export_row.security_header_count,
            "geoip": geoip,
            "whois": whois,
            "favicon": {
                "hash": export_row.favicon_hash,
                "url": export_row.favicon_url,
            },
            "timestamp": export_row.main.timestamp,
            "run_id": export_row.main.run_id,
        });

        serde_json::to_writer(&mut writer, &json_obj)?;
        writeln!(writer)?;

        record_count += 1;
    }

    Ok(record_count)
}
