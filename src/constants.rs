//! # System Constants
//!
//! Context variable names, outcome values and package layout constants shared
//! by every pipeline stage. Variable names are the literal keys the external
//! workflow scheduler uses when it populates an [`OrchestrationContext`].
//!
//! [`OrchestrationContext`]: crate::orchestration::OrchestrationContext

/// Workflow variables read from and written to the orchestration context
pub mod variables {
    // Inputs supplied by the scheduler
    pub const REQUEST_ACTION: &str = "requestAction";
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const TENANT_ID: &str = "tenant_id";
    pub const APP_INSTANCE_ID: &str = "app_instance_id";
    pub const APP_PACKAGE_ID: &str = "app_package_id";
    pub const APP_ID: &str = "app_id";
    pub const APP_NAME: &str = "app_name";
    pub const APP_DESCR: &str = "app_descr";
    pub const MEC_HOST: &str = "mec_host";
    pub const HW_CAPABILITIES: &str = "hw_capabilities";
    pub const MEP_CAPABILITY_ID: &str = "mep_capability_id";

    // Outputs produced by stages
    pub const APP_REQUIRED: &str = "app_required";
    pub const APP_RULES: &str = "app_rules";
    pub const PROCESS_FLOW_RESULT: &str = "process_flow_result";
    pub const PROCESS_FLOW_MESSAGE: &str = "process_flow_message";
    pub const PROCESS_FLOW_ERROR_CODE: &str = "process_flow_error_code";
}

/// Values written to [`variables::PROCESS_FLOW_RESULT`]
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const ERROR: &str = "error";
}

/// Application package layout
pub mod package {
    /// Extension of package archives stored under the package base path
    pub const DEFAULT_EXTENSION: &str = ".csar";

    /// Path fragment identifying the main service template inside an archive
    pub const DEFAULT_DESCRIPTOR_MARKER: &str = "/MainServiceTemplate.yaml";

    /// Largest descriptor size limit configuration may set (4 MiB)
    pub const MAX_DESCRIPTOR_BYTES_CEILING: u64 = 4 * 1024 * 1024;

    /// Upper bound on the descriptor body read into memory
    pub const DEFAULT_MAX_DESCRIPTOR_BYTES: u64 = MAX_DESCRIPTOR_BYTES_CEILING;
}

/// Keys walked from the descriptor root down to the deployment rule properties
pub mod descriptor_keys {
    pub const TOPOLOGY: &str = "topology_template";
    pub const NODES: &str = "node_templates";
    pub const APP_CONFIG: &str = "app_configuration";
    pub const PROPERTIES: &str = "properties";

    /// Full lookup path, outermost first
    pub const RULES_PATH: [&str; 4] = [TOPOLOGY, NODES, APP_CONFIG, PROPERTIES];
}

/// Pipeline stage names used for logging and result metadata
pub mod stages {
    pub const INPUT_PARAMETERS: &str = "input_parameters";
    pub const DECOMPOSE_PACKAGE: &str = "decompose_package";
}

/// Environment variable names consulted at startup
pub mod env {
    pub const ENVIRONMENT: &str = "APPO_ENV";
    pub const FALLBACK_ENVIRONMENT: &str = "APP_ENV";
    pub const LOG_FILTER: &str = "APPO_LOG";
    pub const CONFIG_PREFIX: &str = "APPO";
}
