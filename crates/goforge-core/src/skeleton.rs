use serde::Serialize;

use crate::error::Result;
use crate::symbols::TestableSymbol;
use crate::template::{self, TemplateEngine};

/// Everything needed to render one companion test file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    pub package_name: String,
    pub symbols: Vec<TestableSymbol>,
    pub table_driven: bool,
}

#[derive(Serialize)]
struct TestFileContext<'a> {
    package: &'a str,
    functions: Vec<FunctionContext<'a>>,
}

#[derive(Serialize)]
struct FunctionContext<'a> {
    name: &'a str,
    test_name: String,
    table_driven: bool,
}

/// Render the text of a `_test.go` file for `req`.
///
/// One `Test<Name>` function per symbol, in the order given. Table-driven
/// mode always emits the same two cases, `"test case 1"` and `"test case 2"`.
pub fn render(req: &RenderRequest) -> Result<String> {
    render_with(TemplateEngine::shared()?, req)
}

pub fn render_with(engine: &TemplateEngine, req: &RenderRequest) -> Result<String> {
    let ctx = TestFileContext {
        package: &req.package_name,
        functions: req
            .symbols
            .iter()
            .map(|s| FunctionContext {
                name: &s.name,
                test_name: s.test_name(),
                table_driven: req.table_driven,
            })
            .collect(),
    };
    engine.render(template::TEST_FILE, &ctx)
}
