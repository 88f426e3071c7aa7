//! Explain command - explain diagnostic codes

use anyhow::{anyhow, Result};
use clap::Args;

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ExplainArgs {
    /// Diagnostic code to explain (e.g., U001, S002)
    pub code: String,
}

struct ErrorExplanation {
    code: &'static str,
    title: &'static str,
    description: &'static str,
    example: Option<&'static str>,
    suggestion: Option<&'static str>,
    related: &'static [&'static str],
}

const ERROR_EXPLANATIONS: &[ErrorExplanation] = &[
    ErrorExplanation {
        code: "P001",
        title: "Parse Error",
        description: "The JavaScript parser encountered invalid syntax. Input is parsed as a classic script, so module syntax such as import and export is rejected.",
        example: Some("var x = ;  // Missing value"),
        suggestion: Some("Check for syntax errors like missing semicolons, brackets, or values."),
        related: &[],
    },
    ErrorExplanation {
        code: "U001",
        title: "Unsupported Statement",
        description: "The statement has no Lua lowering. It is replaced by a --[[Kind]] comment and conversion continues with the next statement.",
        example: Some("for (const item of items) { use(item); }  // ForOfStatement\nclass Point {}                           // ClassDeclaration"),
        suggestion: Some("Rewrite with ES5 constructs: an index-based for loop, a constructor function with a prototype."),
        related: &["U002", "U006"],
    },
    ErrorExplanation {
        code: "U002",
        title: "Unsupported Expression",
        description: "The expression has no Lua lowering. It evaluates to nil in the output, followed by a --[[Kind]] comment.",
        example: Some("var add = (a, b) => a + b;  // ArrowFunctionExpression\nvar s = `x = ${x}`;         // TemplateLiteral"),
        suggestion: Some("Use function expressions and string concatenation."),
        related: &["U001", "U004"],
    },
    ErrorExplanation {
        code: "U003",
        title: "Unsupported Pattern",
        description: "Only plain identifiers can be bound by var declarations and function parameters. Destructuring, default values and rest parameters are not lowered.",
        example: Some("function f({ a, b }, c = 1, ...rest) {}"),
        suggestion: Some("Bind a plain parameter and read its properties inside the body."),
        related: &["U002"],
    },
    ErrorExplanation {
        code: "U004",
        title: "Unsupported Object Member",
        description: "Object literals are lowered as key/value tables. Getters, setters and spread members are replaced by nil.",
        example: Some("var o = { get size() { return n; }, ...defaults };"),
        suggestion: Some("Use plain properties, or copy members in a loop after construction."),
        related: &["U002"],
    },
    ErrorExplanation {
        code: "U005",
        title: "Multiple Catch Clauses",
        description: "A try statement carries more than one catch clause. Only the first clause is lowered; a --[[MultipleCatchClauses]] marker is left in the output.",
        example: None,
        suggestion: Some("Use a single catch clause and dispatch on the caught value inside it."),
        related: &["U001"],
    },
    ErrorExplanation {
        code: "U006",
        title: "Continue Outside Loop",
        description: "A continue statement has no enclosing loop that it can jump to, or names a label that is not on a loop.",
        example: Some("block: { continue block; }"),
        suggestion: Some("Use break with a label to leave a block early."),
        related: &["U001"],
    },
    ErrorExplanation {
        code: "S001",
        title: "Partial With Scope",
        description: r#"Names inside a with body are not looked up on the scope object first.

The object is converted once with __ToObject and kept in a local, but identifiers
in the body still resolve to the surrounding variables and globals. The help line
lists every name that the object could have shadowed."#,
        example: Some("with (Math) { r = max(a, b); }  // max is read as a global"),
        suggestion: Some("Qualify the names explicitly: r = Math.max(a, b);"),
        related: &["S002"],
    },
    ErrorExplanation {
        code: "S002",
        title: "Dynamic Eval",
        description: "A direct call to eval runs the evaluated code in the global scope of the Lua runtime. It cannot read or assign the caller's local variables.",
        example: Some("function f(x) { return eval('x + 1'); }  // x is not visible"),
        suggestion: Some("Pass values explicitly, or replace eval with a lookup table of functions."),
        related: &["S001"],
    },
    ErrorExplanation {
        code: "I001",
        title: "Internal Error",
        description: "The translator met a tree it does not expect. The output for the affected construct is missing.",
        example: None,
        suggestion: Some("Please report the input that triggers this diagnostic."),
        related: &[],
    },
];

fn find_explanation(code: &str) -> Option<&'static ErrorExplanation> {
    ERROR_EXPLANATIONS
        .iter()
        .find(|e| e.code.eq_ignore_ascii_case(code))
}

pub fn run(args: ExplainArgs, format: OutputFormat, use_color: bool) -> Result<()> {
    let code = args.code.to_uppercase();

    let explanation =
        find_explanation(&code).ok_or_else(|| anyhow!("Unknown diagnostic code: {}", code))?;

    match format {
        OutputFormat::Text => {
            if use_color {
                println!(
                    "\n{}: {}\n{}",
                    console::style(&code).bold().cyan(),
                    console::style(explanation.title).bold(),
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            } else {
                println!(
                    "\n{}: {}\n{}",
                    code,
                    explanation.title,
                    "=".repeat(code.len() + explanation.title.len() + 2)
                );
            }

            println!("\n{}\n", explanation.description);

            if let Some(example) = explanation.example {
                if use_color {
                    println!("{}:", console::style("Example").bold());
                } else {
                    println!("Example:");
                }
                for line in example.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if let Some(suggestion) = explanation.suggestion {
                if use_color {
                    println!("{}:", console::style("Suggestion").bold().green());
                } else {
                    println!("Suggestion:");
                }
                for line in suggestion.lines() {
                    println!("  {}", line);
                }
                println!();
            }

            if !explanation.related.is_empty() {
                if use_color {
                    println!(
                        "{}: {}",
                        console::style("Related").dim(),
                        explanation.related.join(", ")
                    );
                } else {
                    println!("Related: {}", explanation.related.join(", "));
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "code": explanation.code,
                "title": explanation.title,
                "description": explanation.description,
                "example": explanation.example,
                "suggestion": explanation.suggestion,
                "related": explanation.related,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jslua_diagnostics::DiagnosticCode;

    #[test]
    fn test_every_code_is_explained() {
        for code in DiagnosticCode::ALL {
            assert!(
                find_explanation(code.as_str()).is_some(),
                "no explanation for {}",
                code
            );
        }
    }

    #[test]
    fn test_related_codes_exist() {
        for explanation in ERROR_EXPLANATIONS {
            for related in explanation.related {
                assert!(DiagnosticCode::from_code(related).is_some(), "{}", related);
            }
        }
    }

    #[test]
    fn test_lookup_ignores_case() {
        assert_eq!(find_explanation("s001").map(|e| e.title), Some("Partial With Scope"));
        assert!(find_explanation("T001").is_none());
    }
}
