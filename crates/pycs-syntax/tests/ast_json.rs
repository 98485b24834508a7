//! The syntax tree is dumped as JSON by `pycs --emit ast`; these tests pin
//! the shape of that output.

use pycs_syntax::read_python;
use serde_json::json;

#[test]
fn assignment_serializes_with_span() {
    let module = read_python("x = 1\n").unwrap();
    assert_eq!(
        serde_json::to_value(&module).unwrap(),
        json!({
            "body": [{
                "kind": {"Assign": {"targets": [{"Name": "x"}], "value": {"Int": "1"}}},
                "span": {"line": 1, "column": 1}
            }]
        })
    );
}

#[test]
fn call_and_literals_serialize() {
    let module = read_python("print('hi', None)\n").unwrap();
    assert_eq!(
        serde_json::to_value(&module.body[0].kind).unwrap(),
        json!({
            "Expr": {"Call": {
                "func": {"Name": "print"},
                "args": [
                    {"Positional": {"Str": {"body": "hi", "raw": false, "bytes": false}}},
                    {"Positional": "None"}
                ]
            }}
        })
    );
}
