//! Recursive-descent parser for the debugger's MI result-record grammar.
//!
//! MI payloads look like JSON but are not: keys are bare identifiers, `=`
//! stands in for `:`, and the same key may repeat inside one object. This
//! module turns that grammar into a small tree (`MiValue`) and lowers the
//! tree to a JSON string that `serde_json` can decode normally.

/// One node of a parsed MI tree.
///
/// Every node produced by the parser is exactly one of these three shapes —
/// there is no "null"/"number"/"bool" variant because MI never emits one;
/// every scalar is a quoted string.
#[derive(Debug, Clone, PartialEq)]
pub enum MiValue {
    /// Ordered key/value pairs. Keys are not required to be unique.
    Object(Vec<(String, MiValue)>),
    /// Ordered anonymous children.
    Array(Vec<MiValue>),
    /// A quoted string, retained verbatim including the surrounding quotes.
    Scalar(String),
}

impl MiValue {
    /// Lower this tree to a JSON string.
    ///
    /// Object keys are emitted in ASCII double quotes with no escaping (MI
    /// keys are always bare identifiers, so nothing to escape). Array
    /// elements discard any key they may carry — an MI array is positionally
    /// a list of values even when its elements are written as `key=value`.
    pub fn to_json(&self) -> String {
        match self {
            MiValue::Object(children) => {
                let mut buf = String::from("{");
                for (i, (key, value)) in children.iter().enumerate() {
                    if i > 0 {
                        buf.push(',');
                    }
                    buf.push('"');
                    buf.push_str(key);
                    buf.push_str("\":");
                    buf.push_str(&value.to_json());
                }
                buf.push('}');
                buf
            }
            MiValue::Array(children) => {
                let mut buf = String::from("[");
                for (i, value) in children.iter().enumerate() {
                    if i > 0 {
                        buf.push(',');
                    }
                    buf.push_str(&value.to_json());
                }
                buf.push(']');
                buf
            }
            MiValue::Scalar(quoted) => quoted.clone(),
        }
    }
}

/// Parse the interior of an MI object: `{` `keyvalue` (`,` `keyvalue`)* `}`.
///
/// Returns the parsed node and the number of bytes of `input` consumed,
/// starting from (and including) the opening `{`.
pub fn parse_object(input: &str) -> (MiValue, usize) {
    let bytes = input.as_bytes();
    let mut children = Vec::new();
    let mut i = 1usize; // skip leading '{'

    while i < bytes.len() {
        match bytes[i] {
            b'}' => break,
            b',' => i += 1,
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            _ => {
                let (key, value, size) = parse_keyvalue(&input[i..]);
                children.push((key, value));
                i += size;
            }
        }
    }

    (MiValue::Object(children), i + 1)
}

/// Parse a quoted string: begins with `"`, ends at the first unescaped `"`.
///
/// The returned string retains its surrounding quotes, so it is already a
/// valid JSON string literal. The only recognised in-string escape is `\"`,
/// which is left escaped in the retained text.
pub fn parse_string(input: &str) -> (String, usize) {
    let bytes = input.as_bytes();
    let mut i = 1usize; // skip leading '"'

    while i < bytes.len() {
        let c = bytes[i];
        if c == b'"' && bytes[i - 1] != b'\\' {
            i += 1;
            break;
        }
        i += 1;
    }

    (input[..i].to_string(), i)
}

/// Parse an MI array: `[` element (`,` element)* `]`.
///
/// An element may be a bare value or a `key=value` pair; either way only the
/// value survives into the resulting `Array` — keys on array elements are a
/// quirk of the grammar (e.g. repeated `thread-id=` entries) and carry no
/// information once the element's position is fixed.
pub fn parse_array(input: &str) -> (MiValue, usize) {
    let bytes = input.as_bytes();
    let mut children = Vec::new();
    let mut i = 1usize; // skip leading '['

    while i < bytes.len() {
        match bytes[i] {
            b']' => break,
            b',' => i += 1,
            b' ' | b'\t' | b'\r' | b'\n' => i += 1,
            b'"' => {
                let (s, size) = parse_string(&input[i..]);
                children.push(MiValue::Scalar(s));
                i += size;
            }
            b'{' => {
                let (node, size) = parse_object(&input[i..]);
                children.push(node);
                i += size;
            }
            b'[' => {
                let (node, size) = parse_array(&input[i..]);
                children.push(node);
                i += size;
            }
            _ => {
                let (_key, value, size) = parse_keyvalue(&input[i..]);
                children.push(value);
                i += size;
            }
        }
    }

    (MiValue::Array(children), i + 1)
}

/// Parse one `identifier = value` pair, or a bare value with an empty key.
///
/// Returns `(key, value, consumed-length)`. `key` is empty when `input`
/// begins directly with a value (no `identifier =` prefix) — this happens
/// for unkeyed array elements.
pub fn parse_keyvalue(input: &str) -> (String, MiValue, usize) {
    let bytes = input.as_bytes();
    let mut key_buf = String::new();
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'=' => {
                i += 1;
                break;
            }
            b'{' => {
                let (node, size) = parse_object(&input[i..]);
                return (key_buf, node, i + size);
            }
            b'[' => {
                let (node, size) = parse_array(&input[i..]);
                return (key_buf, node, i + size);
            }
            b'"' => {
                let (s, size) = parse_string(&input[i..]);
                return (key_buf, MiValue::Scalar(s), i + size);
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            c => {
                key_buf.push(c as char);
                i += 1;
            }
        }
    }

    // We consumed an '=' (or ran off the end) and still need the value.
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                let (node, size) = parse_object(&input[i..]);
                return (key_buf, node, i + size);
            }
            b'[' => {
                let (node, size) = parse_array(&input[i..]);
                return (key_buf, node, i + size);
            }
            b'"' => {
                let (s, size) = parse_string(&input[i..]);
                return (key_buf, MiValue::Scalar(s), i + size);
            }
            b' ' | b'\t' | b'\n' | b'\r' => i += 1,
            _ => break,
        }
    }

    (key_buf, MiValue::Object(Vec::new()), i)
}

/// Parse a top-level MI payload (the interior of an implicit object) into a
/// tree and its lowered JSON string.
///
/// `payload` is the raw text after the comma in a result or async record
/// (e.g. `nr_rows="0",nr_cols="6",...`), without the enclosing braces that
/// [`parse_object`] expects — this wraps it in `{…}` first, matching the
/// MI grammar's "a top-level payload is the interior of an object" rule.
/// The returned JSON string is a complete JSON object (including its own
/// `{` `}`), ready to hand to `serde_json::from_str`.
pub fn parse_payload(payload: &str) -> (MiValue, String) {
    let wrapped = format!("{{{payload}}}");
    let (node, _consumed) = parse_object(&wrapped);
    let json = node.to_json();
    (node, json)
}
