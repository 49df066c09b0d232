//! Binding layer: read and write a JSON value tree at a name path
//!
//! Only `Key` and `Index` segments address real values; a stable `Item`
//! segment never appears in a name path and resolves to nothing.

use serde_json::{Map, Value};

use super::field_path::PathSegment;

pub fn get<'a>(root: &'a Value, path: &[PathSegment]) -> Option<&'a Value> {
    let mut current = root;
    for segment in path {
        current = match segment {
            PathSegment::Key(name) => current.get(name)?,
            PathSegment::Index(index) => current.get(index)?,
            PathSegment::Item(_) => return None,
        };
    }
    Some(current)
}

/// Write `value` at `path`, creating intermediate objects/array slots as needed
pub fn set(root: &mut Value, path: &[PathSegment], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        *root = value;
        return;
    };

    let mut current = root;
    for segment in parents {
        current = match segment {
            PathSegment::Key(name) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                match current {
                    Value::Object(map) => map.entry(name.clone()).or_insert(Value::Null),
                    _ => return,
                }
            }
            PathSegment::Index(index) => {
                if !current.is_array() {
                    *current = Value::Array(Vec::new());
                }
                match current {
                    Value::Array(items) => {
                        while items.len() <= *index {
                            items.push(Value::Null);
                        }
                        &mut items[*index]
                    }
                    _ => return,
                }
            }
            PathSegment::Item(_) => return,
        };
    }

    match last {
        PathSegment::Key(name) => {
            if !current.is_object() {
                *current = Value::Object(Map::new());
            }
            if let Value::Object(map) = current {
                map.insert(name.clone(), value);
            }
        }
        PathSegment::Index(index) => {
            if !current.is_array() {
                *current = Value::Array(Vec::new());
            }
            if let Value::Array(items) = current {
                while items.len() <= *index {
                    items.push(Value::Null);
                }
                items[*index] = value;
            }
        }
        PathSegment::Item(_) => {}
    }
}

/// Remove the value at `path`; array slots are spliced out, not nulled
pub fn remove(root: &mut Value, path: &[PathSegment]) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let Some(parent) = get_mut(root, parents) else {
        return;
    };

    match last {
        PathSegment::Key(name) => {
            if let Some(obj) = parent.as_object_mut() {
                obj.remove(name);
            }
        }
        PathSegment::Index(index) => {
            if let Some(items) = parent.as_array_mut() {
                if *index < items.len() {
                    items.remove(*index);
                }
            }
        }
        PathSegment::Item(_) => {}
    }
}

fn get_mut<'a>(root: &'a mut Value, path: &[PathSegment]) -> Option<&'a mut Value> {
    let mut current = root;
    for segment in path {
        current = match segment {
            PathSegment::Key(name) => current.get_mut(name)?,
            PathSegment::Index(index) => current.get_mut(index)?,
            PathSegment::Item(_) => return None,
        };
    }
    Some(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::field_path::FieldPath;
    use serde_json::json;

    #[test]
    fn test_get_nested() {
        let record = json!({"position": {"lat": 52.1}, "connectors": [{"standard": "IEC62196T2"}]});
        let path = FieldPath::root().child("connectors").item(1, 0).child("standard");
        assert_eq!(
            get(&record, path.name_path()),
            Some(&json!("IEC62196T2"))
        );
        assert_eq!(get(&record, path.key()), None);
    }

    #[test]
    fn test_set_creates_intermediate_nodes() {
        let mut record = json!({});
        let path = FieldPath::root().child("position").child("lat");
        set(&mut record, path.name_path(), json!(52.1));
        assert_eq!(record, json!({"position": {"lat": 52.1}}));
    }

    #[test]
    fn test_set_grows_arrays() {
        let mut record = json!({});
        let path = FieldPath::root().child("connectors").item(1, 1).child("id");
        set(&mut record, path.name_path(), json!(2));
        assert_eq!(record, json!({"connectors": [null, {"id": 2}]}));
    }

    #[test]
    fn test_remove_splices_array_items() {
        let mut record = json!({"connectors": [{"id": 1}, {"id": 2}, {"id": 3}]});
        remove(
            &mut record,
            FieldPath::root().child("connectors").item(0, 1).name_path(),
        );
        assert_eq!(record, json!({"connectors": [{"id": 1}, {"id": 3}]}));
    }

    #[test]
    fn test_remove_object_key() {
        let mut record = json!({"a": 1, "b": 2});
        remove(&mut record, FieldPath::root().child("a").name_path());
        assert_eq!(record, json!({"b": 2}));
    }
}
