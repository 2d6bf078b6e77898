#![allow(dead_code)]

use appo_core::models::{InstanceRecord, OperationalStatus};
use appo_core::package::RequiredService;
use proptest::prelude::*;

/// Small pool of app ids so generated services and instances collide often
pub fn app_id_strategy() -> impl Strategy<Value = String> {
    "app-[a-f]"
}

pub fn operational_status_strategy() -> impl Strategy<Value = OperationalStatus> {
    prop_oneof![
        3 => Just(OperationalStatus::Instantiated),
        1 => Just(OperationalStatus::Created),
        1 => Just(OperationalStatus::Instantiating),
        1 => Just(OperationalStatus::InstantiationFailed),
        1 => Just(OperationalStatus::Terminated),
    ]
}

/// Instance records on a single host
pub fn instance_records_strategy() -> impl Strategy<Value = Vec<InstanceRecord>> {
    prop::collection::vec(
        ("inst-[a-z0-9]{4}", app_id_strategy(), operational_status_strategy()),
        0..12,
    )
    .prop_map(|records| {
        records
            .into_iter()
            .map(|(instance, app, status)| InstanceRecord::new(instance, app, status, "host"))
            .collect()
    })
}

/// Package id: absent, blank, or a real id
pub fn package_id_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "pkg-[a-z]{1,6}".prop_map(Some),
        "pkg-[a-z]{1,6}".prop_map(Some),
    ]
}

pub fn required_service_strategy() -> impl Strategy<Value = RequiredService> {
    (app_id_strategy(), "svc-[a-z]{1,8}", package_id_strategy()).prop_map(
        |(app_id, service_name, package_id)| RequiredService {
            app_id,
            service_name,
            package_id,
            version: None,
        },
    )
}

/// Services that are all platform capabilities
pub fn platform_services_strategy() -> impl Strategy<Value = Vec<RequiredService>> {
    prop::collection::vec(
        (
            app_id_strategy(),
            "svc-[a-z]{1,8}",
            prop_oneof![Just(None), Just(Some(String::new())), Just(Some("  ".to_string()))],
        ),
        0..8,
    )
    .prop_map(|services| {
        services
            .into_iter()
            .map(|(app_id, service_name, package_id)| RequiredService {
                app_id,
                service_name,
                package_id,
                version: None,
            })
            .collect()
    })
}

pub fn required_services_strategy() -> impl Strategy<Value = Vec<RequiredService>> {
    prop::collection::vec(required_service_strategy(), 0..8)
}
