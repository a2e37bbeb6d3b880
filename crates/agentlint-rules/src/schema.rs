use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::model::ValidatorManifest;

/// Emit the JSON Schema for validator descriptor files.
pub fn validator_json_schema() -> RootSchema {
    schema_for!(ValidatorManifest)
}
