pub(crate) use {
    std::{
        collections::{
            BTreeMap,
            BTreeSet,
            HashMap,
            HashSet,
        },
        fmt,
    },
    chrono::prelude::*,
    itertools::Itertools as _,
    rocket::{
        FromForm,
        Responder,
        State,
        form::{
            self,
            Context,
            Contextual,
            Form,
        },
        http::Status,
        request::{
            FlashMessage,
            Request,
        },
        response::{
            Flash,
            Redirect,
            content::RawHtml,
        },
        uri,
    },
    rocket_csrf::CsrfToken,
    rocket_util::{
        CsrfForm,
        ToHtml,
        html,
    },
    serde::Deserialize,
    sqlx::{
        PgPool,
        Postgres,
        Transaction,
    },
    crate::{
        Environment,
        auth::{
            Admin,
            User,
        },
        catalog::Catalog,
        chapter::{
            Chapter,
            ChapterContent,
            Level,
            Voice,
        },
        config::Config,
        directory::{
            Directory,
            DirectoryUser,
            Tree,
            UserDirectory,
            UserId,
        },
        http::{
            PageError,
            RedirectOrContent,
            StatusOrError,
            page,
        },
        prefs::{
            PreferenceStore,
            Preferences,
        },
        settings::Settings,
    },
};
