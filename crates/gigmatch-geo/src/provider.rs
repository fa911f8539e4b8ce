/// What a strategy in a provider chain did with a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderOutcome<T> {
    /// The provider handled the request. `T` may itself encode "no match".
    Resolved(T),
    /// The provider is not configured or cannot serve this request; try the
    /// next one.
    NotApplicable,
}
