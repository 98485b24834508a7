//! End-to-end translation tests: Python source in, C# source out.

use pycs_csharp::{Severity, TranslateError, TranslateOptions, Translation, translate_source};

fn translate(source: &str) -> Translation {
    translate_source(source, &TranslateOptions::default()).expect("translation failed")
}

fn cs(source: &str) -> String {
    translate(source).code
}

mod declarations {
    use super::*;

    #[test]
    fn module_variables_are_declared_once_in_order() {
        assert_eq!(
            cs("x = 1\ny = x + 2\nprint(y)\n"),
            "PyVariable x, y;\nx = 1;\ny = x + 2;\nprint(y);\n"
        );
    }

    #[test]
    fn reassignment_does_not_redeclare() {
        assert_eq!(
            cs("b = 1\na = 2\nb = 3\n"),
            "PyVariable b, a;\nb = 1;\na = 2;\nb = 3;\n"
        );
    }

    #[test]
    fn attribute_and_subscript_targets_are_not_declared() {
        assert_eq!(cs("obj.x = 1\nitems[0] = 2\n"), "obj.x = 1;\nitems[0] = 2;\n");
    }

    #[test]
    fn chained_and_tuple_assignment() {
        assert_eq!(
            cs("a = b = 1\nx, y = y, x\n"),
            "PyVariable a, b, x, y;\na = 1;\nb = a;\n(x, y) = (y, x);\n"
        );
    }

    #[test]
    fn annotated_assignment_without_value_only_declares() {
        assert_eq!(cs("n: int\nm: int = 2\n"), "PyVariable n, m;\nm = 2;\n");
    }

    #[test]
    fn parameters_are_not_redeclared() {
        insta::assert_snapshot!(cs("def add(a, b=1):\n    a = a + b\n    total = a\n    return total\n"), @r"
        PyVariable add(PyVariable a, PyVariable b = 1)
        {
            PyVariable total;
            a = a + b;
            total = a;
            return total;
        }
        ");
    }

    #[test]
    fn global_names_are_declared_at_module_level() {
        insta::assert_snapshot!(cs("def bump():\n    global counter\n    counter = 1\n"), @r"
        PyVariable counter;
        void bump()
        {
            counter = 1;
        }
        ");
    }

    #[test]
    fn declaration_rendering_is_deterministic() {
        let source = "b = 1\na = b\nfor i in a:\n    c = i\n";
        let first = translate(source);
        let second = translate(source);
        assert_eq!(first, second);
        assert_eq!(first.code.lines().next(), Some("PyVariable b, a, i, c;"));
    }

    #[test]
    fn keywords_are_escaped() {
        assert_eq!(cs("string = 'a'\n"), "PyVariable @string;\n@string = \"a\";\n");
    }
}

mod control_flow {
    use super::*;

    #[test]
    fn if_elif_else_chain() {
        insta::assert_snapshot!(cs("if a:\n    x = 1\nelif b:\n    x = 2\nelse:\n    x = 3\n"), @r"
        PyVariable x;
        if (a)
        {
            x = 1;
        }
        else if (b)
        {
            x = 2;
        }
        else
        {
            x = 3;
        }
        ");
    }

    #[test]
    fn while_else_break_clears_sentinel() {
        insta::assert_snapshot!(cs("while cond():\n    break\nelse:\n    done()\n"), @r"
        bool noBreak = true;
        while (cond())
        {
            noBreak = false;
            break;
        }
        if (noBreak)
        {
            done();
        }
        ");
    }

    #[test]
    fn while_without_else_has_no_sentinel() {
        assert_eq!(
            cs("while x:\n    break\n"),
            "while (x)\n{\n    break;\n}\n"
        );
    }

    #[test]
    fn for_else_runs_else_when_body_never_runs() {
        insta::assert_snapshot!(cs("for x in seq:\n    f(x)\nelse:\n    e()\n"), @r"
        PyVariable x;
        bool loopExecuted = false;
        foreach (var _it in seq)
        {
            loopExecuted = true;
            x = _it;
            f(x);
        }
        if (!loopExecuted)
        {
            e();
        }
        ");
    }

    #[test]
    fn nested_loop_sentinels_get_fresh_names() {
        let source = "\
while a:
    while b:
        break
    else:
        inner()
else:
    outer()
";
        insta::assert_snapshot!(cs(source), @r"
        bool noBreak = true;
        while (a)
        {
            bool noBreak1 = true;
            while (b)
            {
                noBreak1 = false;
                break;
            }
            if (noBreak1)
            {
                inner();
            }
        }
        if (noBreak)
        {
            outer();
        }
        ");
    }

    #[test]
    fn sentinels_avoid_names_assigned_later() {
        insta::assert_snapshot!(cs("while cond():\n    break\nelse:\n    done()\nnoBreak = 1\n"), @r"
        PyVariable noBreak;
        bool noBreak1 = true;
        while (cond())
        {
            noBreak1 = false;
            break;
        }
        if (noBreak1)
        {
            done();
        }
        noBreak = 1;
        ");
        insta::assert_snapshot!(cs("for x in xs:\n    pass\n_it = 3\n"), @r"
        PyVariable x, _it;
        foreach (var _it1 in xs)
        {
            x = _it1;
            ;
        }
        _it = 3;
        ");
    }

    #[test]
    fn bare_calls_inside_blocks() {
        assert_eq!(cs("if c:\n    print(y)\n"), "if (c)\n{\n    print(y);\n}\n");
    }

    #[test]
    fn tuple_loop_target_is_deconstructed() {
        insta::assert_snapshot!(cs("for k, v in pairs:\n    continue\n"), @r"
        PyVariable k, v;
        foreach (var _it in pairs)
        {
            (k, v) = _it;
            continue;
        }
        ");
    }
}

mod exceptions {
    use super::*;

    #[test]
    fn try_blocks_follow_try_catch_finally_else_order() {
        let source = "\
try:
    t()
except A as e:
    c1()
else:
    el()
finally:
    f()
";
        insta::assert_snapshot!(cs(source), @r"
        bool noException;
        noException = false;
        try
        {
            t();
            noException = true;
        }
        catch (A e)
        {
            c1();
        }
        finally
        {
            f();
        }
        if (noException)
        {
            el();
        }
        ");
    }

    #[test]
    fn exception_flag_is_declared_once_per_scope() {
        let out = cs("try:\n    a()\nexcept:\n    pass\ntry:\n    b()\nexcept:\n    pass\n");
        assert_eq!(out.matches("bool noException").count(), 1);
        assert_eq!(out.matches("catch\n").count(), 2);
    }

    #[test]
    fn exception_flag_avoids_names_assigned_later() {
        insta::assert_snapshot!(cs("try:\n    a()\nexcept E:\n    pass\nelse:\n    b()\nnoException = 1\n"), @r"
        PyVariable noException;
        bool noException1;
        noException1 = false;
        try
        {
            a();
            noException1 = true;
        }
        catch (E)
        {
            ;
        }
        if (noException1)
        {
            b();
        }
        noException = 1;
        ");
    }

    #[test]
    fn multiple_exception_types_use_a_filter() {
        let out = cs("try:\n    a()\nexcept (KeyError, IndexError) as err:\n    pass\n");
        assert!(out.contains("catch (Exception err) when (err is KeyError || err is IndexError)"));
    }

    #[test]
    fn raise_constructs_exceptions() {
        assert_eq!(
            cs("raise ValueError('bad')\n"),
            "throw new ValueError(\"bad\");\n"
        );
        assert_eq!(cs("raise\n"), "throw;\n");
        assert_eq!(cs("raise err\n"), "throw err;\n");
    }
}

mod definitions {
    use super::*;

    #[test]
    fn class_members_and_static_constructor() {
        let source = "\
class Point:
    count = 0
    def __init__(self, x):
        self.x = x
    def norm(self):
        return self.x
";
        insta::assert_snapshot!(cs(source), @r"
        class Point
        {
            public static PyVariable count;
            public PyVariable x;
            static Point()
            {
                count = 0;
            }
            public Point(PyVariable x)
            {
                this.x = x;
            }
            public PyVariable norm()
            {
                return this.x;
            }
        }
        ");
    }

    #[test]
    fn classes_follow_top_level_statements() {
        insta::assert_snapshot!(cs("class A(Base):\n    pass\nx = A()\n"), @r"
        PyVariable x;
        x = A();

        class A : Base
        {
        }
        ");
    }

    #[test]
    fn static_methods_keep_all_parameters() {
        let out = cs("class M:\n    @staticmethod\n    def twice(x):\n        return x * 2\n");
        assert!(out.contains("public static PyVariable twice(PyVariable x)"));
    }

    #[test]
    fn generators_return_enumerables() {
        insta::assert_snapshot!(cs("def gen(xs):\n    for x in xs:\n        yield x\n"), @r"
        IEnumerable<PyVariable> gen(PyVariable xs)
        {
            PyVariable x;
            foreach (var _it in xs)
            {
                x = _it;
                yield return x;
            }
        }
        ");
    }

    #[test]
    fn statement_yields_make_iterators() {
        let out = translate("def gen():\n    \"\"\"Counts.\"\"\"\n    yield 1\n    return 2\n");
        insta::assert_snapshot!(out.code, @r"
        IEnumerable<PyVariable> gen()
        {
            // Counts.
            yield return 1;
            yield break;
        }
        ");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].node_kind, "return_statement");
        assert_eq!(out.diagnostics[0].line, 4);
    }

    #[test]
    fn async_functions_return_tasks() {
        let out = cs("async def fetch(url):\n    return await get(url)\n");
        assert!(out.starts_with("async Task<PyVariable> fetch(PyVariable url)\n"));
        assert!(out.contains("return await get(url);"));
    }

    #[test]
    fn unknown_decorators_are_reported() {
        let out = translate("@cache\ndef f():\n    pass\n");
        assert_eq!(out.code, "// @cache\nvoid f()\n{\n    ;\n}\n");
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(out.diagnostics[0].node_kind, "decorator");
        assert_eq!(out.diagnostics[0].line, 1);
    }
}

mod expressions {
    use super::*;

    #[test]
    fn power_uses_helper_and_precedence_is_rederived() {
        assert_eq!(
            cs("y = (a + b) * c ** 2\n"),
            "PyVariable y;\ny = (a + b) * pow(c, 2);\n"
        );
    }

    #[test]
    fn comparison_chains_split() {
        assert_eq!(cs("ok = a < b < c\n"), "PyVariable ok;\nok = a < b && b < c;\n");
    }

    #[test]
    fn membership_and_identity() {
        assert_eq!(cs("f(x in xs, y is None)\n"), "f(xs.Contains(x), y == null);\n");
    }

    #[test]
    fn fstrings_become_interpolated_strings() {
        assert_eq!(cs("print(f\"hi {name}!\")\n"), "print($\"hi {name}!\");\n");
    }

    #[test]
    fn stepped_slices_spell_out_bounds() {
        assert_eq!(
            cs("y = a[::2]\nz = a[:2]\nw = a[1:n:k]\n"),
            "PyVariable y, z, w;\ny = a[0..^0..2];\nz = a[..2];\nw = a[1..n..k];\n"
        );
    }

    #[test]
    fn configured_runtime_names_are_used() {
        let options: TranslateOptions =
            toml::from_str("[runtime]\nvalue_type = \"dynamic\"\npow_fn = \"Py.Pow\"\n").unwrap();
        let out = translate_source("x = 2 ** 8\n", &options).unwrap();
        assert_eq!(out.code, "dynamic x;\nx = Py.Pow(2, 8);\n");
    }
}

mod statements {
    use super::*;

    #[test]
    fn imports_become_usings() {
        assert_eq!(
            cs("import os.path\nfrom collections import OrderedDict as OD\nx = 1\n"),
            "using os.path;\nusing OD = collections.OrderedDict;\n\nPyVariable x;\nx = 1;\n"
        );
    }

    #[test]
    fn match_arms_keep_order() {
        let source = "\
match cmd:
    case \"go\":
        go()
    case [x, *rest]:
        pass
    case _:
        stop()
";
        insta::assert_snapshot!(cs(source), @r#"
        switch (cmd)
        {
            case "go":
                go();
                break;
            case [var x, .. var rest]:
                ;
                break;
            default:
                stop();
                break;
        }
        "#);
    }

    #[test]
    fn with_binds_its_target() {
        insta::assert_snapshot!(cs("with open(p) as fh:\n    fh.read()\n"), @r"
        PyVariable fh;
        using (fh = open(p))
        {
            fh.read();
        }
        ");
    }

    #[test]
    fn docstrings_become_comments() {
        assert_eq!(cs("\"\"\"Module doc.\"\"\"\nx = 1\n"), "PyVariable x;\n// Module doc.\nx = 1;\n");
    }

    #[test]
    fn delete_and_assert() {
        assert_eq!(
            cs("del x\nassert ok, 'msg'\n"),
            "x = null;\nSystem.Diagnostics.Debug.Assert(ok, \"msg\");\n"
        );
    }
}

mod fallbacks {
    use super::*;

    #[test]
    fn keyword_splat_is_kept_with_a_warning() {
        let out = translate("f(**opts)\n");
        assert!(out.has_warnings());
        assert!(out.diagnostics.iter().all(|d| d.severity == Severity::Warning));
        assert_eq!(out.diagnostics[0].line, 1);
    }

    #[test]
    fn translation_serializes_for_json_reports() {
        let out = translate("f(**opts)\n");
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["code"], out.code.as_str());
        assert_eq!(json["diagnostics"][0]["severity"], "warning");
        assert_eq!(json["diagnostics"][0]["line"], 1);
    }

    #[test]
    fn clean_input_has_no_diagnostics() {
        let out = translate("x = [1, 2]\nfor i in x:\n    print(i)\n");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn syntax_errors_abort() {
        let err = translate_source("x = (1,\n", &TranslateOptions::default()).unwrap_err();
        assert!(matches!(err, TranslateError::Read(_)));
    }
}
