use serde::Deserialize;
use serde::Serialize;

use crate::FormatOptions;

/// Marker replaced with the formatter specific call in [`DRIVER_SCRIPT_TEMPLATE`].
const CALL_PLACEHOLDER: &str = "__FORMAT_CALL__";

/// Reads a [`DriverRequest`] from stdin, runs the formatter call and writes a
/// [`DriverResponse`] to stdout. The call must assign the result to `text`.
///
/// Exceptions are reported as data so the host receives them unmodified.
const DRIVER_SCRIPT_TEMPLATE: &str = r#"import json
import sys
import traceback

# keep library output from corrupting the response
stdout = sys.stdout
sys.stdout = sys.stderr

request = json.loads(sys.stdin.read())
code = request["code"]
options = request["options"]
try:
__FORMAT_CALL__
    response = {"kind": "formatted", "text": text}
except BaseException as err:
    response = {
        "kind": "exception",
        "exceptionType": type(err).__name__,
        "message": str(err),
        "traceback": traceback.format_exc(),
    }
stdout.write(json.dumps(response))
stdout.flush()
"#;

/// Builds the driver script for a call snippet.
///
/// Each line of `call` is indented into the `try` block of the template.
pub fn build_driver_script(call: &str) -> String {
  let indented = call.lines().map(|line| format!("    {}", line)).collect::<Vec<_>>().join("\n");
  DRIVER_SCRIPT_TEMPLATE.replace(CALL_PLACEHOLDER, &indented)
}

/// Script that only checks a module can be imported.
pub fn build_import_probe_script(module_name: &str) -> String {
  format!("import {}", module_name)
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DriverRequest<'a> {
  pub formatter: &'a str,
  pub code: &'a str,
  pub options: &'a FormatOptions,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DriverResponse {
  Formatted {
    text: String,
  },
  #[serde(rename_all = "camelCase")]
  Exception {
    exception_type: String,
    message: String,
    traceback: String,
  },
}
