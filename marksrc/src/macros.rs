// Early-return an error value, the way the parsers in this workspace do.
macro_rules! return_err {
    ($arg: expr) => {
        return Err($arg)
    };
}
