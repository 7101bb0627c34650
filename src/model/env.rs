/// The value half of a `TraceClass` environment entry: "int64 or string"
/// verbatim, per §3.2.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum EnvironmentValue {
    Int(i64),
    String(String),
}

impl From<i64> for EnvironmentValue {
    fn from(value: i64) -> Self {
        EnvironmentValue::Int(value)
    }
}

impl From<&str> for EnvironmentValue {
    fn from(value: &str) -> Self {
        EnvironmentValue::String(value.to_string())
    }
}

impl From<String> for EnvironmentValue {
    fn from(value: String) -> Self {
        EnvironmentValue::String(value)
    }
}
