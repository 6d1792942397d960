//! Insight history kept as one JSON object per record in an S3 bucket.

use crate::error::DataSourceError;
use crate::services::{InsightRecord, InsightStore};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use serde::Serialize;
use tracing::debug;

/// Stores records under `{prefix}/{id}.json`. Record ids sort by creation
/// time, so the newest records are the last keys in listing order.
pub struct S3InsightStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    prefix: String,
}

impl S3InsightStore {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>, prefix: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.trim_matches('/').to_string(),
        }
    }

    fn key_for(&self, record: &InsightRecord) -> String {
        if self.prefix.is_empty() {
            format!("{}.json", record.id)
        } else {
            format!("{}/{}.json", self.prefix, record.id)
        }
    }

    fn list_prefix(&self) -> String {
        if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}/", self.prefix)
        }
    }

    async fn list_keys(&self) -> Result<Vec<String>, DataSourceError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .prefix(self.list_prefix())
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| DataSourceError::S3(DisplayErrorContext(e).to_string()))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|obj| obj.key())
                    .filter(|key| key.ends_with(".json"))
                    .map(str::to_string),
            );
        }

        Ok(keys)
    }

    async fn read_record(&self, key: &str) -> Result<InsightRecord, DataSourceError> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| DataSourceError::S3(DisplayErrorContext(e).to_string()))?;

        let body = object
            .body
            .collect()
            .await
            .map_err(|e| DataSourceError::S3(e.to_string()))?
            .into_bytes();

        Ok(serde_json::from_slice(&body)?)
    }
}

/// Serializes a value to JSON and uploads it to an S3 bucket with `application/json` content type.
async fn write_json_to_s3(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> Result<(), DataSourceError> {
    let body = serde_json::to_vec(value)?;

    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type("application/json")
        .send()
        .await
        .map_err(|e| DataSourceError::S3(DisplayErrorContext(e).to_string()))?;

    Ok(())
}

#[async_trait::async_trait]
impl InsightStore for S3InsightStore {
    async fn recent(&self, limit: usize) -> Result<Vec<InsightRecord>, DataSourceError> {
        let mut keys = self.list_keys().await?;
        keys.sort_unstable_by(|a, b| b.cmp(a));
        keys.truncate(limit);
        debug!(bucket = %self.bucket, keys = keys.len(), "Reading recent insight records");

        let mut records = Vec::with_capacity(keys.len());
        for key in &keys {
            records.push(self.read_record(key).await?);
        }
        Ok(records)
    }

    async fn append(&self, record: &InsightRecord) -> Result<(), DataSourceError> {
        let key = self.key_for(record);
        debug!(bucket = %self.bucket, key = %key, "Writing insight record");
        write_json_to_s3(&self.client, &self.bucket, &key, record).await
    }
}
