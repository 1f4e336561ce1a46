use crate::config::ValidationError;
use crate::rule::RuleError;

quick_error! {
    /// A toplevel error type.
    ///
    /// It wraps the errors of inserting a rule: parsing the rule input and
    /// validating the configuration.
    #[derive(Debug, Clone, Eq, PartialEq)]
    pub enum Error {
        /// The configuration was refused.
        Validation(err: ValidationError) {
            display("invalid configuration: {}", err)
            source(err)
            from()
        }
        /// The rule input was malformed.
        Rule(err: RuleError) {
            display("{}", err)
            source(err)
            from()
        }
    }
}
