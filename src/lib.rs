//! # Strain Scout
//!
//! A catalog-driven cannabis strain identification pipeline.
//!
//! Strain Scout ingests heterogeneous strain-catalog source files into one
//! deduplicated canonical catalog, imports it into a SQLite strain store,
//! and identifies strains at request time by combining perceptual-hash
//! visual matching with packaging/label/AI text signals under a strict
//! resolution precedence.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │   Sources    │──▶│   Catalog     │──▶│  SQLite   │
//! │ csv/txt/json │   │ dedupe+merge │   │  strains  │
//! └──────────────┘   └──────────────┘   └──────────┘
//!
//! ┌──────────────┐   ┌──────────────┐   ┌──────────┐
//! │ Query image  │──▶│ dHash match  │──▶│ Resolve   │──▶ name + confidence
//! │ + text sigs  │   │ + confidence │   │ engine    │
//! └──────────────┘   └──────────────┘   └──────────┘
//! ```
//!
//! The catalog pipeline runs offline; the identification pipeline runs per
//! request and only shares the reference image set derived from the catalog.
//!
//! ## Quick Start
//!
//! ```bash
//! scout init                    # create database
//! scout catalog                 # build the canonical catalog artifact
//! scout import                  # upsert it into the strain store
//! scout match photo.jpg        # best visual match
//! scout resolve request.json   # full signal resolution
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`source_delimited`] | Delimited-table source parser |
//! | [`source_names`] | Plain name-list source parser |
//! | [`source_json`] | Nested-JSON source flattener |
//! | [`normalize`] | Field coalescing, slugs, value coercion |
//! | [`catalog`] | Deduplication and the catalog artifact |
//! | [`import`] | Store import with conflict fallback |
//! | [`dhash`] | Difference-hash fingerprints |
//! | [`matcher`] | Reference-set similarity ranking |
//! | [`confidence`] | Score normalization and tiers |
//! | [`resolve`] | Canonical resolution engine |
//! | [`db`] | Strain store connection |
//! | [`migrate`] | Schema migrations |

pub mod catalog;
pub mod confidence;
pub mod config;
pub mod db;
pub mod dhash;
pub mod import;
pub mod matcher;
pub mod migrate;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod resolve;
pub mod source_delimited;
pub mod source_json;
pub mod source_names;
pub mod sources;
pub mod stats;
