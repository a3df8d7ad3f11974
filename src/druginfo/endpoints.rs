//! Declarative table of every drug-information operation.
//!
//! Each row drives both the HTTP request (method, path, query mapping) and
//! the tool registered with the host. Adding an endpoint means adding a row.

use crate::constants::api::TOOL_PREFIX;
use crate::constants::network::{DEFAULT_TIMEOUT_S, EXPORT_TIMEOUT_S};
use self::ParamKind::{Bool, Int, Str};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Str,
    Int,
    Bool,
}

/// Query parameter: tool argument name, wire name, value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamSpec {
    pub arg: &'static str,
    pub wire: &'static str,
    pub kind: ParamKind,
}

/// Deprecated argument that fills `canonical` (a wire name) only when the
/// canonical argument left it unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasRule {
    pub alias: &'static str,
    pub canonical: &'static str,
    pub kind: ParamKind,
}

/// Identifier substituted into the `{...}` segment of the path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParam {
    pub arg: &'static str,
    pub kind: ParamKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub operation: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub path_param: Option<PathParam>,
    pub query: &'static [ParamSpec],
    pub aliases: &'static [AliasRule],
    pub body: bool,
    pub default_timeout_s: u64,
}

impl Endpoint {
    pub fn tool_name(&self) -> String {
        format!("{}{}", TOOL_PREFIX, self.operation)
    }

    pub fn is_read(&self) -> bool {
        self.method == HttpMethod::Get
    }
}

const fn same(name: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec {
        arg: name,
        wire: name,
        kind,
    }
}

const fn renamed(arg: &'static str, wire: &'static str, kind: ParamKind) -> ParamSpec {
    ParamSpec { arg, wire, kind }
}

const fn alias(alias: &'static str, canonical: &'static str, kind: ParamKind) -> AliasRule {
    AliasRule {
        alias,
        canonical,
        kind,
    }
}

const CODE: Option<PathParam> = Some(PathParam {
    arg: "code",
    kind: Str,
});
const EFFECT_ID: Option<PathParam> = Some(PathParam {
    arg: "effectId",
    kind: Int,
});
const ID: Option<PathParam> = Some(PathParam {
    arg: "id",
    kind: Int,
});

const MAIN_INGREDIENT_QUERY: &[ParamSpec] = &[
    same("a4", Bool),
    same("a4Off", Bool),
    same("a5", Bool),
    same("a5Off", Bool),
    same("drugkind", Bool),
    same("drugkindOff", Bool),
    same("effect", Bool),
    same("effectOff", Bool),
    same("showMapped", Bool),
    same("IngredientCode", Str),
    same("ingredientNameKor", Str),
    same("drugKind", Str),
    same("PageSize", Int),
    same("Page", Int),
    same("SortBy", Str),
];

const MAIN_INGREDIENT_ALIASES: &[AliasRule] = &[
    alias("q", "ingredientNameKor", Str),
    alias("page", "Page", Int),
    alias("size", "PageSize", Int),
];

const PRODUCT_QUERY: &[ParamSpec] = &[
    same("crop", Bool),
    same("cropOff", Bool),
    same("base64", Bool),
    same("base64Off", Bool),
    same("watermark", Bool),
    same("watermarkOff", Bool),
    same("confirm", Bool),
    same("confirmOff", Bool),
    same("teoulLengthShort", Bool),
    same("teoulLengthShortOff", Bool),
    same("teoulLengthLong", Bool),
    same("teoulLengthLongOff", Bool),
    same("minCount", Int),
    same("ProductCode", Str),
    same("pillName", Str),
    same("vendor", Str),
    same("PageSize", Int),
    same("Page", Int),
    same("SortBy", Str),
];

const PRODUCT_ALIASES: &[AliasRule] = &[
    alias("q", "pillName", Str),
    alias("page", "Page", Int),
    alias("size", "PageSize", Int),
];

// drug-effect, drug-kind and the guides take camelCase arguments but the API
// expects PascalCase paging names.
const EDIT_PAGING_QUERY: &[ParamSpec] = &[
    same("edit", Str),
    renamed("pageSize", "PageSize", Int),
    renamed("page", "Page", Int),
    renamed("sortBy", "SortBy", Str),
];

const PICTO_QUERY: &[ParamSpec] = &[
    same("IsDeleted", Str),
    same("Title", Str),
    same("PageSize", Int),
    same("Page", Int),
    same("SortBy", Str),
];

const EDICODE_QUERY: &[ParamSpec] = &[
    same("ProductCode", Str),
    same("EdiCode", Str),
    same("PageSize", Int),
    same("Page", Int),
    same("SortBy", Str),
];

const fn list(
    operation: &'static str,
    description: &'static str,
    path: &'static str,
    query: &'static [ParamSpec],
    aliases: &'static [AliasRule],
) -> Endpoint {
    Endpoint {
        operation,
        description,
        method: HttpMethod::Get,
        path,
        path_param: None,
        query,
        aliases,
        body: false,
        default_timeout_s: DEFAULT_TIMEOUT_S,
    }
}

const fn fetch(
    operation: &'static str,
    description: &'static str,
    path: &'static str,
    path_param: Option<PathParam>,
) -> Endpoint {
    Endpoint {
        operation,
        description,
        method: HttpMethod::Get,
        path,
        path_param,
        query: &[],
        aliases: &[],
        body: false,
        default_timeout_s: DEFAULT_TIMEOUT_S,
    }
}

const fn write(
    operation: &'static str,
    description: &'static str,
    method: HttpMethod,
    path: &'static str,
    path_param: Option<PathParam>,
) -> Endpoint {
    Endpoint {
        operation,
        description,
        method,
        path,
        path_param,
        query: &[],
        aliases: &[],
        body: true,
        default_timeout_s: DEFAULT_TIMEOUT_S,
    }
}

const fn delete(
    operation: &'static str,
    description: &'static str,
    path: &'static str,
    path_param: Option<PathParam>,
) -> Endpoint {
    Endpoint {
        operation,
        description,
        method: HttpMethod::Delete,
        path,
        path_param,
        query: &[],
        aliases: &[],
        body: false,
        default_timeout_s: DEFAULT_TIMEOUT_S,
    }
}

pub static ENDPOINTS: &[Endpoint] = &[
    list(
        "list_main_ingredient",
        "List main ingredients with filters, paging and sorting. Legacy aliases: q (ingredientNameKor), page (Page), size (PageSize).",
        "/main-ingredient",
        MAIN_INGREDIENT_QUERY,
        MAIN_INGREDIENT_ALIASES,
    ),
    fetch(
        "get_main_ingredient_by_code",
        "Fetch one main ingredient by its code.",
        "/main-ingredient/{code}",
        CODE,
    ),
    list(
        "list_main_ingredient_drug_effect",
        "List drug-effect records of main ingredients.",
        "/main-ingredient/drug-effect",
        EDIT_PAGING_QUERY,
        &[],
    ),
    fetch(
        "get_main_ingredient_drug_effect_by_id",
        "Fetch one drug-effect record by id.",
        "/main-ingredient/drug-effect/{effectId}",
        EFFECT_ID,
    ),
    list(
        "list_main_ingredient_drug_kind",
        "List drug-kind records of main ingredients.",
        "/main-ingredient/drug-kind",
        EDIT_PAGING_QUERY,
        &[],
    ),
    list(
        "list_main_ingredient_guide_a4",
        "List A4 guide documents of main ingredients.",
        "/main-ingredient/guide-a4",
        EDIT_PAGING_QUERY,
        &[],
    ),
    list(
        "list_main_ingredient_guide_a5",
        "List A5 guide documents of main ingredients.",
        "/main-ingredient/guide-A5",
        EDIT_PAGING_QUERY,
        &[],
    ),
    list(
        "list_main_ingredient_picto",
        "List pictogram records of main ingredients.",
        "/main-ingredient/picto",
        PICTO_QUERY,
        &[],
    ),
    fetch(
        "get_main_ingredient_picto_by_code",
        "Fetch one pictogram record by code.",
        "/main-ingredient/picto/{code}",
        CODE,
    ),
    list(
        "list_product",
        "List products with filters, paging and sorting. Legacy aliases: q (pillName), page (Page), size (PageSize).",
        "/product",
        PRODUCT_QUERY,
        PRODUCT_ALIASES,
    ),
    fetch(
        "get_product_by_code",
        "Fetch one product by its code.",
        "/product/{code}",
        CODE,
    ),
    list(
        "list_product_edicode",
        "List EDI codes of products.",
        "/product/edicode",
        EDICODE_QUERY,
        &[],
    ),
    write(
        "create_drug_effect",
        "Create a drug-effect record.",
        HttpMethod::Post,
        "/main-ingredient/drug-effect",
        None,
    ),
    write(
        "merge_drug_effect",
        "Merge drug-effect records.",
        HttpMethod::Post,
        "/main-ingredient/drug-effect/merge",
        None,
    ),
    write(
        "update_drug_effect",
        "Update a drug-effect record.",
        HttpMethod::Put,
        "/main-ingredient/drug-effect",
        None,
    ),
    delete(
        "delete_drug_effect",
        "Delete a drug-effect record by id.",
        "/main-ingredient/drug-effect/{effectId}",
        EFFECT_ID,
    ),
    write(
        "create_drug_kind",
        "Create a drug-kind record.",
        HttpMethod::Post,
        "/main-ingredient/drug-kind",
        None,
    ),
    write(
        "merge_drug_kind",
        "Merge drug-kind records.",
        HttpMethod::Post,
        "/main-ingredient/drug-kind/merge",
        None,
    ),
    write(
        "update_drug_kind",
        "Update a drug-kind record.",
        HttpMethod::Put,
        "/main-ingredient/drug-kind",
        None,
    ),
    delete(
        "delete_drug_kind",
        "Delete a drug-kind record by id.",
        "/main-ingredient/drug-kind/{id}",
        ID,
    ),
    write(
        "create_guide_a4",
        "Create an A4 guide document.",
        HttpMethod::Post,
        "/main-ingredient/guide-a4",
        None,
    ),
    write(
        "merge_guide_a4",
        "Merge A4 guide documents.",
        HttpMethod::Post,
        "/main-ingredient/guide-a4/merge",
        None,
    ),
    write(
        "update_guide_a4",
        "Update an A4 guide document.",
        HttpMethod::Put,
        "/main-ingredient/guide-a4",
        None,
    ),
    delete(
        "delete_guide_a4",
        "Delete an A4 guide document by id.",
        "/main-ingredient/guide-a4/{id}",
        ID,
    ),
    write(
        "create_guide_a5",
        "Create an A5 guide document.",
        HttpMethod::Post,
        "/main-ingredient/guide-A5",
        None,
    ),
    write(
        "merge_guide_a5",
        "Merge A5 guide documents.",
        HttpMethod::Post,
        "/main-ingredient/guide-A5/merge",
        None,
    ),
    write(
        "update_guide_a5",
        "Update an A5 guide document.",
        HttpMethod::Put,
        "/main-ingredient/guide-A5",
        None,
    ),
    delete(
        "delete_guide_a5",
        "Delete an A5 guide document by id.",
        "/main-ingredient/guide-A5/{id}",
        ID,
    ),
    write(
        "create_main_ingredient",
        "Create a main ingredient.",
        HttpMethod::Post,
        "/main-ingredient",
        None,
    ),
    write(
        "bulk_main_ingredient",
        "Bulk-apply changes to the main ingredient with the given code.",
        HttpMethod::Post,
        "/main-ingredient/{code}/bulk",
        CODE,
    ),
    write(
        "update_main_ingredient",
        "Update a main ingredient.",
        HttpMethod::Put,
        "/main-ingredient",
        None,
    ),
    delete(
        "delete_main_ingredient",
        "Delete a main ingredient by code.",
        "/main-ingredient/{code}",
        CODE,
    ),
    delete(
        "delete_main_ingredient_cache",
        "Drop the server-side cache entry of a main ingredient.",
        "/main-ingredient/{code}/cache",
        CODE,
    ),
    write(
        "update_main_ingredient_picto",
        "Update a pictogram record.",
        HttpMethod::Put,
        "/main-ingredient/picto",
        None,
    ),
    write(
        "create_product",
        "Create a product.",
        HttpMethod::Post,
        "/product",
        None,
    ),
    write(
        "update_product",
        "Update a product.",
        HttpMethod::Put,
        "/product",
        None,
    ),
    Endpoint {
        default_timeout_s: EXPORT_TIMEOUT_S,
        ..write(
            "export_product",
            "Export products matching the request body.",
            HttpMethod::Post,
            "/product/export",
            None,
        )
    },
    delete(
        "delete_product",
        "Delete a product by code.",
        "/product/{code}",
        CODE,
    ),
];

pub fn endpoints() -> &'static [Endpoint] {
    ENDPOINTS
}

pub fn endpoint_by_operation(operation: &str) -> Option<&'static Endpoint> {
    ENDPOINTS.iter().find(|endpoint| endpoint.operation == operation)
}
