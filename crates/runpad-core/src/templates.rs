//! Default programs shown when a language is selected.

/// Template returned for languages without a dedicated program.
pub const FALLBACK_TEMPLATE: &str = "// Start coding here";

/// Returns the default source for `language_id`.
///
/// Total over any input: unknown ids, and catalog entries without a
/// dedicated template, get [`FALLBACK_TEMPLATE`].
pub fn default_code(language_id: &str) -> &'static str {
    match language_id {
        "py" => r#"print("Hello from Python!")"#,
        "js" => r#"console.log("Hello from JavaScript!");"#,
        "ts" => "const greeting: string = \"Hello from TypeScript!\";\nconsole.log(greeting);",
        "go" => "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"Hello from Go!\")\n}",
        "cpp" => "#include <iostream>\n\nint main() {\n    std::cout << \"Hello from C++!\" << std::endl;\n    return 0;\n}",
        "c" => "#include <stdio.h>\n\nint main() {\n    printf(\"Hello from C!\\n\");\n    return 0;\n}",
        "java" => "class HelloWorld {\n    public static void main(String[] args) {\n        System.out.println(\"Hello from Java!\");\n    }\n}",
        "rs" => "fn main() {\n    println!(\"Hello from Rust!\");\n}",
        "kt" => "fun main() {\n    println(\"Hello from Kotlin!\")\n}",
        "cs" => "using System;\n\nclass HelloWorld {\n    static void Main() {\n        Console.WriteLine(\"Hello from C#!\");\n    }\n}",
        _ => FALLBACK_TEMPLATE,
    }
}
