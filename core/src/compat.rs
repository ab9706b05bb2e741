//! Positional-argument form of `get` / `post` / `put`.
//!
//! Accepts `url, [data], [callback], [dataType]` with the optional parts
//! disambiguated by count and kind:
//!
//! | args | meaning |
//! |------|---------|
//! | 1 | url |
//! | 2 | url, callback if callable else data |
//! | 3 | url, data, callback / url, callback, dataType / url, data, dataType |
//! | 4 | url, data, callback, dataType |
//!
//! With three arguments the checks run in that order; a combination matching
//! none of them keeps only the url.

use crate::error::Error;
use crate::options::{RequestOptions, ResponseCallback, ResponseOutcome};
use crate::value::RequestData;

/// One positional argument.
#[derive(Debug)]
pub enum Arg {
    /// A string: the url, a raw query string or a data type, by position.
    Str(String),
    Data(RequestData),
    Callback(ResponseCallback),
}

impl Arg {
    pub fn callback<F>(f: F) -> Self
    where
        F: FnOnce(ResponseOutcome) + Send + 'static,
    {
        Arg::Callback(ResponseCallback::new(f))
    }

    fn is_callable(&self) -> bool {
        matches!(self, Arg::Callback(_))
    }

    fn is_string(&self) -> bool {
        matches!(self, Arg::Str(_))
    }

    fn into_data(self) -> Option<RequestData> {
        match self {
            Arg::Str(s) => Some(RequestData::Query(s)),
            Arg::Data(d) => Some(d),
            Arg::Callback(_) => None,
        }
    }

    fn into_callback(self) -> Option<ResponseCallback> {
        match self {
            Arg::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    fn into_string(self) -> Option<String> {
        match self {
            Arg::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Str(value.to_string())
    }
}

impl From<String> for Arg {
    fn from(value: String) -> Self {
        Arg::Str(value)
    }
}

impl From<RequestData> for Arg {
    fn from(value: RequestData) -> Self {
        Arg::Data(value)
    }
}

impl From<crate::value::Value> for Arg {
    fn from(value: crate::value::Value) -> Self {
        Arg::Data(value.into())
    }
}

impl From<Vec<crate::value::FormField>> for Arg {
    fn from(value: Vec<crate::value::FormField>) -> Self {
        Arg::Data(value.into())
    }
}

impl From<ResponseCallback> for Arg {
    fn from(value: ResponseCallback) -> Self {
        Arg::Callback(value)
    }
}

/// Map a positional argument list onto `RequestOptions`.
pub fn handle_arguments(args: Vec<Arg>) -> Result<RequestOptions, Error> {
    if args.len() > 4 {
        return Err(Error::invalid(format!("expected at most 4 arguments, got {}", args.len())));
    }

    let mut args = args.into_iter();
    let url = match args.next() {
        Some(Arg::Str(url)) => url,
        _ => return Err(Error::invalid("URL string argument must be provided")),
    };
    let mut options = RequestOptions::new(url);
    let rest: Vec<Arg> = args.collect();

    let mut data_type = None;
    match <[Arg; 3]>::try_from(rest) {
        Ok([data, callback, dt]) => {
            options.data = data.into_data();
            options.callback = callback.into_callback();
            data_type = dt.into_string();
        }
        Err(rest) => match <[Arg; 2]>::try_from(rest) {
            Ok([second, third]) => {
                if third.is_callable() {
                    options.data = second.into_data();
                    options.callback = third.into_callback();
                } else if second.is_callable() {
                    options.callback = second.into_callback();
                    data_type = third.into_string();
                } else if third.is_string() {
                    options.data = second.into_data();
                    data_type = third.into_string();
                }
            }
            Err(rest) => {
                if let Some(second) = rest.into_iter().next() {
                    if second.is_callable() {
                        options.callback = second.into_callback();
                    } else {
                        options.data = second.into_data();
                    }
                }
            }
        },
    }

    if let Some(dt) = data_type {
        options.data_type = Some(dt.parse()?);
    }
    Ok(options)
}
