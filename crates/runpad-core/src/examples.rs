//! Named example programs.

/// A named example program for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeExample {
    /// Catalog id of the language.
    pub language_id: &'static str,
    /// Display name, unique within a language.
    pub name: &'static str,
    /// Program source.
    pub code: &'static str,
}

static EXAMPLES: &[CodeExample] = &[
    CodeExample {
        language_id: "bac",
        name: "Hello World",
        code: r#"func main() {
    print("Hello from BasicCode!\n");
}"#,
    },
    CodeExample {
        language_id: "bac",
        name: "Calculator",
        code: r#"func main() {
    let x = 10;
    let y = 5;

    print("Basic Calculator\n");
    print("x = ");
    print(x);
    print(", y = ");
    print(y);
    print("\n");

    print("Addition: ");
    print(x + y);
    print("\n");

    print("Subtraction: ");
    print(x - y);
    print("\n");

    print("Multiplication: ");
    print(x * y);
    print("\n");

    print("Division: ");
    print(x / y);
    print("\n");
}"#,
    },
    CodeExample {
        language_id: "bac",
        name: "Loop Example",
        code: r#"func main() {
    print("Counting from 1 to 5:\n");

    let i = 1;
    while (i <= 5) {
        print(i);
        print("\n");
        i = i + 1;
    }

    print("Done!\n");
}"#,
    },
];

/// Returns the examples available for `language_id`, in display order.
pub fn examples_for(language_id: &str) -> Vec<&'static CodeExample> {
    EXAMPLES
        .iter()
        .filter(|e| e.language_id == language_id)
        .collect()
}

/// Finds an example by language and name (case-insensitive).
pub fn example(language_id: &str, name: &str) -> Option<&'static CodeExample> {
    EXAMPLES
        .iter()
        .find(|e| e.language_id == language_id && e.name.eq_ignore_ascii_case(name))
}
