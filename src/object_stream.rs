//! Compressed object streams (`/ObjStm`): several indirect objects packed
//! into one stream, decoded on demand.

use std::collections::BTreeMap;

use crate::object::ObjectId;
use crate::{Error, Object, Result, Stream};

/// The decoded contents of one `/ObjStm`: every object it carries, keyed by
/// `(object number, generation 0)`.
pub struct ObjectStream {
    pub objects: BTreeMap<ObjectId, Object>,
}

impl ObjectStream {
    /// Decodes `stream` and parses its `N` header pairs `(objnum, relative
    /// offset)` followed by the object bodies starting at `/First`.
    pub fn new(stream: &Stream) -> Result<Self> {
        let n = stream.dict.get(b"N").and_then(Object::as_i64)? as usize;
        let first = stream.dict.get(b"First").and_then(Object::as_i64)? as usize;

        let data = stream.decompressed_content()?;
        if first > data.len() {
            return Err(Error::InvalidStream("ObjStm /First is past the decoded payload".to_string()));
        }

        let header = &data[..first];
        let body = &data[first..];

        let mut cursor = 0usize;
        let mut headers = Vec::with_capacity(n);
        for _ in 0..n {
            let (objnum, consumed) = read_uint(header, cursor)?;
            cursor = consumed;
            let (offset, consumed) = read_uint(header, cursor)?;
            cursor = consumed;
            headers.push((objnum as u32, offset as usize));
        }

        let mut objects = BTreeMap::new();
        for (id, offset) in headers {
            if offset > body.len() {
                continue;
            }
            let (object, _) = crate::parser::parse_object(&body[offset..])?;
            objects.insert((id, 0), object);
        }

        Ok(ObjectStream { objects })
    }
}

fn read_uint(buf: &[u8], mut pos: usize) -> Result<(i64, usize)> {
    while pos < buf.len() && buf[pos].is_ascii_whitespace() {
        pos += 1;
    }
    let start = pos;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        pos += 1;
    }
    if start == pos {
        return Err(Error::InvalidStream("ObjStm header is malformed".to_string()));
    }
    let value = std::str::from_utf8(&buf[start..pos])
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .ok_or_else(|| Error::InvalidStream("ObjStm header is malformed".to_string()))?;
    Ok((value, pos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Dictionary;

    #[test]
    fn decodes_two_objects() {
        let body = b"42 true ";
        let header = b"1 0 2 6 ";
        let mut payload = header.to_vec();
        payload.extend_from_slice(body);

        let mut dict = Dictionary::new();
        dict.set("Type", "ObjStm");
        dict.set("N", Object::Integer(2));
        dict.set("First", Object::Integer(header.len() as i64));

        let mut stream = Stream::new(dict, payload);
        let obj_stream = ObjectStream::new(&mut stream).unwrap();

        assert_eq!(obj_stream.objects.get(&(1, 0)), Some(&Object::Integer(42)));
        assert_eq!(obj_stream.objects.get(&(2, 0)), Some(&Object::Boolean(true)));
    }
}
