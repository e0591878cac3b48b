// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::{block_on, connect};
use crate::config::Config;
use crate::error::Result;
use crate::schemas;

pub fn run(config: &Config, base_url: Option<String>, id: &str, resource_type: &str) -> Result<()> {
    let api = connect(config, base_url, schemas::by_name(resource_type)?)?;
    let client = &api;
    let resource = block_on(|cancel| async move { client.get(id, &cancel).await })?;

    let document = serde_json::json!({ "data": api.codec().encode_resource(&resource)? });
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}
