/*
 * Licensed to the Apache Software Foundation (ASF) under one
 * or more contributor license agreements.  See the NOTICE file
 * distributed with this work for additional information
 * regarding copyright ownership.  The ASF licenses this file
 * to you under the Apache License, Version 2.0 (the
 * "License"); you may not use this file except in compliance
 * with the License.  You may obtain a copy of the License at
 *
 *   http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing,
 * software distributed under the License is distributed on an
 * "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
 * KIND, either express or implied.  See the License for the
 * specific language governing permissions and limitations
 * under the License.
 */

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use envmap::{
    BoxError, ConvertError, ConvertOptions, EnvMap, MarshalText, Record, convert, must_convert,
    render, with_prefix,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Once;
use std::time::Duration;
use test_case::test_case;

static TRACING: Once = Once::new();

fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Debug, Default, Clone)]
struct Base64Text(String);

impl MarshalText for Base64Text {
    fn marshal_text(&self) -> Result<String, BoxError> {
        Ok(STANDARD.encode(self.0.as_bytes()))
    }
}

envmap::impl_to_env_value_via_marshal_text!(Base64Text);

#[derive(Debug, Default, Record)]
struct DbConfig {
    #[env(name = "TIMEOUT")]
    timeout: Duration,
}

#[derive(Debug, Default, Record)]
struct AppConfig {
    #[env(name = "MODE")]
    mode: String,
    #[env(prefix = "DB_")]
    db: DbConfig,
    #[env(name = "EMPTY_FIELD")]
    empty_field: String,
    #[env(name = "REQUIRED_FIELD", required)]
    required_field: i32,
    #[env(name = "USER_MAP")]
    user_map: HashMap<String, String>,
    #[env(name = "MARSHALING")]
    marshaling: Base64Text,
    #[env(name = "MARSHALING_MAP")]
    marshaling_map: HashMap<String, Base64Text>,
}

#[derive(Record)]
struct EmptyConfig {}

#[derive(Debug, Default, Clone, Copy)]
struct Port(u16);

impl MarshalText for Port {
    fn marshal_text(&self) -> Result<String, BoxError> {
        Ok(format!("port-{}", self.0))
    }
}

envmap::impl_to_env_value_via_marshal_text!(Port);

#[derive(Debug, Default, Clone, Copy)]
enum Transport {
    #[default]
    Tcp,
}

#[derive(Default, Record)]
struct EndpointConfig {
    #[env(name = "PORT")]
    port: Port,
    #[env(leaf)]
    #[allow(dead_code)]
    transport: Transport,
    #[env(name = "RAW_PORT")]
    raw_port: u16,
    #[env(name = "RATIO")]
    ratio: f32,
    #[env(name = "WEIGHTS")]
    weights: Vec<f32>,
}

fn filled_config() -> AppConfig {
    AppConfig {
        mode: "prod".to_owned(),
        db: DbConfig {
            timeout: Duration::from_secs(1),
        },
        empty_field: String::new(),
        required_field: 3,
        user_map: HashMap::from([("id-1".to_owned(), "ab".to_owned())]),
        marshaling: Base64Text("test".to_owned()),
        marshaling_map: HashMap::from([("k1".to_owned(), Base64Text("v1".to_owned()))]),
    }
}

fn env(pairs: &[(&str, &str)]) -> EnvMap {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[test]
fn empty_config_should_produce_empty_map() {
    init_tracing();
    let values = convert(&EmptyConfig {}, ConvertOptions::default()).unwrap();
    assert!(values.is_empty());
}

#[test]
fn non_filled_config_should_produce_empty_map() {
    init_tracing();
    let values = convert(&AppConfig::default(), with_prefix("APP_")).unwrap();
    assert_eq!(values, EnvMap::new());
}

#[test]
fn filled_config_should_produce_prefixed_keys() {
    init_tracing();
    let values = convert(&filled_config(), with_prefix("APP_")).unwrap();

    assert_eq!(
        values,
        env(&[
            ("APP_MODE", "prod"),
            ("APP_DB_TIMEOUT", "1s"),
            ("APP_REQUIRED_FIELD", "3"),
            ("APP_USER_MAP", "id-1:ab"),
            ("APP_MARSHALING", "dGVzdA=="),
            ("APP_MARSHALING_MAP", "k1:djE="),
        ])
    );
}

#[test]
fn conversion_without_prefix_should_use_bare_keys() {
    init_tracing();
    let values = convert(&filled_config(), ConvertOptions::new()).unwrap();

    assert_eq!(values["MODE"], "prod");
    assert_eq!(values["DB_TIMEOUT"], "1s");
    assert!(!values.contains_key("EMPTY_FIELD"));
}

#[test]
fn later_prefix_option_should_win() {
    init_tracing();
    let options = ConvertOptions::new().with_prefix("FIRST_").with_prefix("SECOND_");
    let values = convert(&filled_config(), options).unwrap();

    assert_eq!(values["SECOND_MODE"], "prod");
    assert!(values.keys().all(|key| key.starts_with("SECOND_")));
}

#[test]
fn marshal_hook_should_win_over_numeric_zero() {
    init_tracing();
    let values = convert(&EndpointConfig::default(), ConvertOptions::default()).unwrap();

    assert_eq!(values, env(&[("PORT", "port-0")]));
}

#[test]
fn single_precision_floats_should_use_shortest_form() {
    init_tracing();
    let config = EndpointConfig {
        port: Port(8080),
        transport: Transport::Tcp,
        raw_port: 8080,
        ratio: 0.1,
        weights: vec![0.25, 0.1, 0.0],
    };
    let values = convert(&config, with_prefix("EP_")).unwrap();

    assert_eq!(
        values,
        env(&[
            ("EP_PORT", "port-8080"),
            ("EP_RAW_PORT", "8080"),
            ("EP_RATIO", "0.1"),
            ("EP_WEIGHTS", "0.25,0.1,"),
        ])
    );
}

#[derive(Default, Record)]
struct ListenerConfig {
    #[env(name = "HOSTS", separator = "|")]
    hosts: Vec<String>,
    #[env(name = "PORTS")]
    ports: Vec<u16>,
    #[env(name = "LABELS", pair_separator = ";", key_value_separator = "=")]
    labels: BTreeMap<String, u32>,
    #[env(name = "TOKEN", secret)]
    token: Option<String>,
    #[env(name = "RETRY_AFTER")]
    retry_after: Option<Duration>,
}

#[test_case(vec!["a", "b"], "a|b" ; "two hosts")]
#[test_case(vec!["only"], "only" ; "single host")]
#[test_case(vec!["", "b"], "|b" ; "empty element is kept")]
fn separator_override_should_join_sequence(hosts: Vec<&str>, expected: &str) {
    init_tracing();
    let config = ListenerConfig {
        hosts: hosts.into_iter().map(str::to_owned).collect(),
        ..Default::default()
    };
    let values = convert(&config, ConvertOptions::default()).unwrap();
    assert_eq!(values["HOSTS"], expected);
}

#[test]
fn map_and_sequence_defaults_should_apply() {
    init_tracing();
    let config = ListenerConfig {
        ports: vec![8080, 8090],
        labels: BTreeMap::from([("zone".to_owned(), 2), ("rack".to_owned(), 7)]),
        token: Some("s3cr3t".to_owned()),
        retry_after: Some(Duration::from_millis(1500)),
        ..Default::default()
    };
    let values = convert(&config, with_prefix("NET_")).unwrap();

    assert_eq!(
        values,
        env(&[
            ("NET_PORTS", "8080,8090"),
            ("NET_LABELS", "rack=7;zone=2"),
            ("NET_TOKEN", "s3cr3t"),
            ("NET_RETRY_AFTER", "1s 500ms"),
        ])
    );
}

#[derive(Record)]
struct RegionConfig {
    #[env(name = "NAME")]
    name: String,
    #[env(prefix = "PRIMARY_")]
    primary: DbConfig,
    #[env(nested)]
    replica: ReplicaConfig,
}

#[derive(Record)]
struct ReplicaConfig {
    #[env(name = "REPLICA_COUNT")]
    count: u8,
}

#[derive(Record)]
struct ClusterConfig {
    #[env(prefix = "EU_")]
    eu: RegionConfig,
    #[env(skip)]
    #[allow(dead_code)]
    runtime_only: RuntimeState,
}

struct RuntimeState;

#[test]
fn nested_prefixes_should_concatenate() {
    init_tracing();
    let config = ClusterConfig {
        eu: RegionConfig {
            name: "frankfurt".to_owned(),
            primary: DbConfig {
                timeout: Duration::from_secs(90 * 60),
            },
            replica: ReplicaConfig { count: 2 },
        },
        runtime_only: RuntimeState,
    };
    let values = convert(&config, with_prefix("CLUSTER_")).unwrap();

    assert_eq!(
        values,
        env(&[
            ("CLUSTER_EU_NAME", "frankfurt"),
            ("CLUSTER_EU_PRIMARY_TIMEOUT", "1h 30m"),
            ("CLUSTER_EU_REPLICA_COUNT", "2"),
        ])
    );
}

#[derive(Debug)]
struct Unencodable;

impl MarshalText for Unencodable {
    fn marshal_text(&self) -> Result<String, BoxError> {
        Err("value cannot be encoded".into())
    }
}

envmap::impl_to_env_value_via_marshal_text!(Unencodable);

#[derive(Record)]
struct BrokenLeaf {
    #[env(name = "BROKEN")]
    broken: Unencodable,
}

#[derive(Record)]
struct BrokenParent {
    #[env(name = "MODE")]
    mode: String,
    #[env(prefix = "CHILD_")]
    child: BrokenLeaf,
}

#[test]
fn marshal_failure_should_report_field_path() {
    init_tracing();
    let config = BrokenParent {
        mode: "prod".to_owned(),
        child: BrokenLeaf {
            broken: Unencodable,
        },
    };
    let error = convert(&config, ConvertOptions::default()).unwrap_err();

    assert!(matches!(error, ConvertError::Field { field: "child", .. }));
    assert_eq!(error.path(), "child.broken");
    assert_eq!(
        error.to_string(),
        "converting field child: converting field broken: marshal text: value cannot be encoded"
    );
}

#[test]
#[should_panic(expected = "marshal text: value cannot be encoded")]
fn must_convert_should_panic_on_failure() {
    init_tracing();
    let config = BrokenLeaf {
        broken: Unencodable,
    };
    must_convert(&config, ConvertOptions::default());
}

#[test]
fn must_convert_should_return_map_on_success() {
    init_tracing();
    let values = must_convert(&filled_config(), with_prefix("APP_"));
    assert_eq!(values.len(), 6);
}

#[test]
fn converted_map_should_render_as_dotenv() {
    init_tracing();
    let values = convert(&filled_config(), with_prefix("APP_")).unwrap();

    assert_eq!(
        render::to_dotenv(&values),
        "APP_DB_TIMEOUT=1s\n\
         APP_MARSHALING=\"dGVzdA==\"\n\
         APP_MARSHALING_MAP=\"k1:djE=\"\n\
         APP_MODE=prod\n\
         APP_REQUIRED_FIELD=3\n\
         APP_USER_MAP=id-1:ab\n"
    );
}
